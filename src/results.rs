use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::question::Question;
use crate::util::rounded_percent;

pub const POSITIVE_THRESHOLD: u32 = 70;
pub const NEUTRAL_THRESHOLD: u32 = 40;

/// Immutable snapshot produced when a session is scored.
///
/// `answers[i]` is the answer given to `questions[i]`; `None` means unanswered.
/// The JSON shape (`score`, `totalQuestions`, `answers`, `questions`) is what the
/// results channel stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsRecord {
    pub score: usize,
    pub total_questions: usize,
    pub answers: Vec<Option<String>>,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    Positive,
    Neutral,
    Retry,
}

impl FeedbackTone {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= POSITIVE_THRESHOLD {
            FeedbackTone::Positive
        } else if percentage >= NEUTRAL_THRESHOLD {
            FeedbackTone::Neutral
        } else {
            FeedbackTone::Retry
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            FeedbackTone::Positive => "Excellent work!",
            FeedbackTone::Neutral => "Good effort!",
            FeedbackTone::Retry => "Keep practicing!",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            FeedbackTone::Positive => {
                "You've demonstrated a strong understanding of the material."
            }
            FeedbackTone::Neutral => {
                "Review the questions you missed to improve your understanding."
            }
            FeedbackTone::Retry => "Focus on understanding the concepts you missed in this quiz.",
        }
    }
}

/// How one question went, for the review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOutcome<'a> {
    pub question: &'a Question,
    pub given: Option<&'a str>,
    pub correct: bool,
}

impl QuestionOutcome<'_> {
    pub fn given_or_placeholder(&self) -> &str {
        self.given.unwrap_or(NOT_ANSWERED)
    }
}

pub const NOT_ANSWERED: &str = "Not answered";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub correct: usize,
    pub incorrect: usize,
}

impl Breakdown {
    pub fn correct_percent(&self) -> u32 {
        rounded_percent(self.correct, self.correct + self.incorrect)
    }

    pub fn incorrect_percent(&self) -> u32 {
        rounded_percent(self.incorrect, self.correct + self.incorrect)
    }
}

impl ResultsRecord {
    pub fn with_completed_at(mut self, at: DateTime<Local>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Answer given to question `index`. Missing trailing slots read as unanswered.
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    pub fn percentage_score(&self) -> u32 {
        rounded_percent(self.score, self.total_questions)
    }

    pub fn feedback_tone(&self) -> FeedbackTone {
        FeedbackTone::from_percentage(self.percentage_score())
    }

    pub fn outcomes(&self) -> impl Iterator<Item = QuestionOutcome<'_>> + '_ {
        self.questions.iter().enumerate().map(|(i, question)| {
            let given = self.answer(i);
            QuestionOutcome {
                question,
                given,
                correct: question.is_correct(given),
            }
        })
    }

    pub fn breakdown(&self) -> Breakdown {
        Breakdown {
            correct: self.score,
            incorrect: self.total_questions.saturating_sub(self.score),
        }
    }

    pub fn contains_question(&self, id: u32) -> bool {
        self.questions.iter().any(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::fixtures::question;

    fn record(score: usize, total: usize) -> ResultsRecord {
        ResultsRecord {
            score,
            total_questions: total,
            answers: vec![],
            questions: vec![],
            title: None,
            completed_at: None,
        }
    }

    #[test]
    fn tone_cut_points_are_exact() {
        assert_eq!(FeedbackTone::from_percentage(100), FeedbackTone::Positive);
        assert_eq!(FeedbackTone::from_percentage(70), FeedbackTone::Positive);
        assert_eq!(FeedbackTone::from_percentage(69), FeedbackTone::Neutral);
        assert_eq!(FeedbackTone::from_percentage(40), FeedbackTone::Neutral);
        assert_eq!(FeedbackTone::from_percentage(39), FeedbackTone::Retry);
        assert_eq!(FeedbackTone::from_percentage(0), FeedbackTone::Retry);
    }

    #[test]
    fn percentage_and_tone() {
        let r = record(4, 5);
        assert_eq!(r.percentage_score(), 80);
        assert_eq!(r.feedback_tone(), FeedbackTone::Positive);

        let r = record(2, 5);
        assert_eq!(r.percentage_score(), 40);
        assert_eq!(r.feedback_tone(), FeedbackTone::Neutral);

        let r = record(1, 3);
        assert_eq!(r.percentage_score(), 33);
        assert_eq!(r.feedback_tone(), FeedbackTone::Retry);
    }

    #[test]
    fn empty_record_scores_zero() {
        let r = record(0, 0);
        assert_eq!(r.percentage_score(), 0);
        assert_eq!(r.feedback_tone(), FeedbackTone::Retry);
    }

    #[test]
    fn outcomes_treat_short_answer_list_as_unanswered() {
        let r = ResultsRecord {
            score: 1,
            total_questions: 2,
            answers: vec![Some("a".into())],
            questions: vec![question(1, "a"), question(2, "b")],
            title: None,
            completed_at: None,
        };
        let outcomes: Vec<_> = r.outcomes().collect();
        assert!(outcomes[0].correct);
        assert!(!outcomes[1].correct);
        assert_eq!(outcomes[1].given, None);
        assert_eq!(outcomes[1].given_or_placeholder(), "Not answered");
    }

    #[test]
    fn breakdown_counts() {
        let b = record(3, 4).breakdown();
        assert_eq!(b, Breakdown { correct: 3, incorrect: 1 });
        assert_eq!(b.correct_percent(), 75);
        assert_eq!(b.incorrect_percent(), 25);
    }

    #[test]
    fn json_uses_wire_field_names() {
        let r = ResultsRecord {
            score: 1,
            total_questions: 2,
            answers: vec![Some("a".into()), None],
            questions: vec![question(1, "a"), question(2, "b")],
            title: None,
            completed_at: None,
        };
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["score"], 1);
        assert_eq!(value["totalQuestions"], 2);
        assert_eq!(value["answers"][1], serde_json::Value::Null);
        assert_eq!(value["questions"][0]["question"], "question 1");
        assert_eq!(value["questions"][0]["correctAnswer"], "a");
        assert!(value.get("completedAt").is_none());
    }

    #[test]
    fn parses_record_without_optional_fields() {
        let json = r#"{
            "score": 0,
            "totalQuestions": 1,
            "answers": [null],
            "questions": [{"id": 1, "question": "q", "options": ["x", "y"],
                           "correctAnswer": "x", "explanation": "e"}]
        }"#;
        let r: ResultsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.total_questions, 1);
        assert_eq!(r.answer(0), None);
        assert!(r.contains_question(1));
        assert!(!r.contains_question(2));
    }
}
