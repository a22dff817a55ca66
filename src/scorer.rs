use crate::answers::AnswerSheet;
use crate::question::QuestionBank;
use crate::results::ResultsRecord;

/// Compare every answer to its question's correct answer. Unanswered is incorrect.
pub fn score(bank: &QuestionBank, sheet: &AnswerSheet) -> ResultsRecord {
    let answers = sheet.snapshot(bank);
    let score = bank
        .questions()
        .iter()
        .zip(&answers)
        .filter(|(q, a)| q.is_correct(a.as_deref()))
        .count();

    ResultsRecord {
        score,
        total_questions: bank.len(),
        answers,
        questions: bank.questions().to_vec(),
        title: Some(bank.title().to_string()),
        completed_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::fixtures::{bank, question};

    #[test]
    fn all_unanswered_scores_zero() {
        let bank = bank(5);
        let record = score(&bank, &AnswerSheet::new());
        assert_eq!(record.score, 0);
        assert_eq!(record.total_questions, 5);
        assert_eq!(record.answers, vec![None; 5]);
    }

    #[test]
    fn four_of_five_correct() {
        let bank = bank(5);
        let mut sheet = AnswerSheet::new();
        for id in 1..=4 {
            sheet.select(id, "a");
        }
        let record = score(&bank, &sheet);
        assert_eq!(record.score, 4);
        assert_eq!(record.percentage_score(), 80);
        assert_eq!(record.answers[4], None);
    }

    #[test]
    fn wrong_answers_do_not_count() {
        let bank = QuestionBank::new(
            "Mixed",
            vec![question(1, "a"), question(2, "b"), question(3, "c")],
        )
        .unwrap();
        let mut sheet = AnswerSheet::new();
        sheet.select(1, "a");
        sheet.select(2, "c");
        sheet.select(3, "c");
        let record = score(&bank, &sheet);
        assert_eq!(record.score, 2);
        assert_eq!(
            record.score,
            record.outcomes().filter(|o| o.correct).count()
        );
    }

    #[test]
    fn record_snapshots_the_bank() {
        let bank = bank(2);
        let record = score(&bank, &AnswerSheet::new());
        assert_eq!(record.questions, bank.questions());
        assert_eq!(record.title.as_deref(), Some("Fixture Quiz"));
        assert!(record.completed_at.is_none());
    }
}
