use std::collections::HashSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BankError, ValidationError};
use crate::settings::QuizSettings;

static BANK_DIR: Dir = include_dir!("src/banks");

pub const DEFAULT_BANK: &str = "machine_learning";

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionKind {
    #[default]
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    FillBlank,
}

/// A single quiz question. `correct_answer` is always one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question", alias = "prompt")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    #[serde(default)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    pub fn is_correct(&self, answer: Option<&str>) -> bool {
        answer == Some(self.correct_answer.as_str())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.options.len() < 2 {
            return Err(ValidationError::TooFewOptions { id: self.id });
        }
        if !self.has_option(&self.correct_answer) {
            return Err(ValidationError::CorrectAnswerNotAnOption {
                id: self.id,
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct BankFile {
    title: String,
    questions: Vec<Question>,
}

/// Ordered, validated, immutable set of questions for one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    title: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Result<Self, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::EmptyBank);
        }
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(ValidationError::DuplicateQuestionId(q.id));
            }
            q.validate()?;
        }
        Ok(Self {
            title: title.into(),
            questions,
        })
    }

    /// Load one of the banks compiled into the binary.
    pub fn builtin(name: &str) -> Result<Self, BankError> {
        let file = BANK_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| ValidationError::UnknownBank(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| ValidationError::UnknownBank(name.to_string()))?;
        Self::from_json(contents)
    }

    pub fn builtin_names() -> Vec<String> {
        let mut names: Vec<String> = BANK_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(contents)?;
        Ok(Self::new(file.title, file.questions)?)
    }

    /// Build the bank for one session: filter by kind, optionally shuffle, cap the count.
    pub fn select<R: Rng + ?Sized>(
        &self,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<QuestionBank, ValidationError> {
        settings.validate()?;

        let mut picked: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| settings.question_types.contains(&q.kind))
            .cloned()
            .collect();

        if picked.is_empty() {
            return Err(ValidationError::no_matching(&settings.question_types));
        }
        if settings.shuffle {
            picked.shuffle(rng);
        }
        picked.truncate(settings.question_count);

        Ok(QuestionBank {
            title: self.title.clone(),
            questions: picked,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use super::fixtures::question;

    #[test]
    fn builtin_machine_learning_bank() {
        let bank = QuestionBank::builtin(DEFAULT_BANK).unwrap();
        assert_eq!(bank.title(), "Machine Learning Quiz");
        assert_eq!(bank.len(), 5);
        assert_eq!(bank.get(0).unwrap().correct_answer, "Directive Learning");
        assert_eq!(bank.get(4).unwrap().correct_answer, "Email spam filtering");
    }

    #[test]
    fn builtin_names_are_sorted() {
        let names = QuestionBank::builtin_names();
        assert_eq!(names, vec!["machine_learning", "neural_networks"]);
    }

    #[test]
    fn unknown_builtin_bank() {
        let err = QuestionBank::builtin("cooking").unwrap_err();
        assert!(matches!(
            err,
            BankError::Validation(ValidationError::UnknownBank(ref n)) if n == "cooking"
        ));
    }

    #[test]
    fn rejects_empty_bank() {
        assert_eq!(
            QuestionBank::new("t", vec![]),
            Err(ValidationError::EmptyBank)
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuestionBank::new("t", vec![question(1, "a"), question(1, "b")]).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateQuestionId(1));
    }

    #[test]
    fn rejects_single_option() {
        let mut q = question(3, "a");
        q.options = vec!["a".into()];
        let err = QuestionBank::new("t", vec![q]).unwrap_err();
        assert_eq!(err, ValidationError::TooFewOptions { id: 3 });
    }

    #[test]
    fn rejects_correct_answer_outside_options() {
        let err = QuestionBank::new("t", vec![question(2, "z")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CorrectAnswerNotAnOption {
                id: 2,
                answer: "z".into()
            }
        );
    }

    #[test]
    fn parses_wire_names_and_default_kind() {
        let json = r#"{
            "title": "Tiny",
            "questions": [
                {"id": 7, "question": "Sky colour?", "options": ["Blue", "Green"],
                 "correctAnswer": "Blue", "explanation": "Rayleigh scattering."},
                {"id": 8, "prompt": "Water is wet.", "options": ["True", "False"],
                 "correctAnswer": "True", "explanation": "Mostly.", "kind": "true-false"}
            ]
        }"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.get(0).unwrap().prompt, "Sky colour?");
        assert_eq!(bank.get(0).unwrap().kind, QuestionKind::MultipleChoice);
        assert_eq!(bank.get(1).unwrap().kind, QuestionKind::TrueFalse);
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = QuestionBank::from_path(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BankError::Io { .. }));
    }

    #[test]
    fn select_filters_by_kind_and_caps_count() {
        let bank = QuestionBank::builtin("neural_networks").unwrap();
        let settings = QuizSettings {
            question_types: vec![QuestionKind::TrueFalse],
            question_count: 2,
            ..QuizSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let picked = bank.select(&settings, &mut rng).unwrap();
        assert_eq!(picked.len(), 2);
        assert!(picked
            .questions()
            .iter()
            .all(|q| q.kind == QuestionKind::TrueFalse));
        // without shuffling the bank order is kept
        assert_eq!(picked.get(0).unwrap().id, 2);
        assert_eq!(picked.get(1).unwrap().id, 4);
    }

    #[test]
    fn select_with_no_matching_kind() {
        let bank = QuestionBank::builtin(DEFAULT_BANK).unwrap();
        let settings = QuizSettings {
            question_types: vec![QuestionKind::FillBlank],
            ..QuizSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            bank.select(&settings, &mut rng),
            Err(ValidationError::no_matching(&[QuestionKind::FillBlank]))
        );
    }

    #[test]
    fn select_shuffle_keeps_the_same_questions() {
        let bank = QuestionBank::builtin(DEFAULT_BANK).unwrap();
        let settings = QuizSettings {
            shuffle: true,
            ..QuizSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let picked = bank.select(&settings, &mut rng).unwrap();
        let mut ids: Vec<u32> = picked.questions().iter().map(|q| q.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn is_correct_uses_exact_match() {
        let q = question(1, "a");
        assert!(q.is_correct(Some("a")));
        assert!(!q.is_correct(Some("A")));
        assert!(!q.is_correct(None));
    }
}
