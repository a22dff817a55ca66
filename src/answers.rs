use std::collections::HashMap;

use crate::question::QuestionBank;
use crate::util::rounded_percent;

/// The user's selected option per question, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: HashMap<u32, String>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite the answer for a question.
    pub fn select(&mut self, question_id: u32, value: impl Into<String>) {
        self.answers.insert(question_id, value.into());
    }

    pub fn get(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn unanswered_count(&self, bank: &QuestionBank) -> usize {
        bank.questions()
            .iter()
            .filter(|q| !self.answers.contains_key(&q.id))
            .count()
    }

    /// Positional view in bank order: slot `i` holds the answer to question `i`.
    pub fn snapshot(&self, bank: &QuestionBank) -> Vec<Option<String>> {
        bank.questions()
            .iter()
            .map(|q| self.answers.get(&q.id).cloned())
            .collect()
    }
}

/// Current question index, always within `[0, len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
}

impl Navigator {
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.len
    }

    /// Returns false when already on the last question.
    pub fn go_next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Returns false when already on the first question.
    pub fn go_previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn progress_percent(&self) -> u32 {
        rounded_percent(self.current + 1, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::fixtures::bank;

    #[test]
    fn select_overwrites() {
        let mut sheet = AnswerSheet::new();
        sheet.select(1, "a");
        sheet.select(1, "b");
        assert_eq!(sheet.get(1), Some("b"));
        assert_eq!(sheet.answered_count(), 1);
    }

    #[test]
    fn snapshot_follows_bank_order() {
        let bank = bank(3);
        let mut sheet = AnswerSheet::new();
        sheet.select(3, "c");
        sheet.select(1, "a");
        assert_eq!(
            sheet.snapshot(&bank),
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );
        assert_eq!(sheet.unanswered_count(&bank), 1);
    }

    #[test]
    fn navigator_stays_in_bounds() {
        let mut nav = Navigator::new(3);
        assert_eq!(nav.current(), 0);
        assert!(!nav.go_previous());
        assert_eq!(nav.current(), 0);

        assert!(nav.go_next());
        assert!(nav.go_next());
        assert!(nav.is_last());
        assert!(!nav.go_next());
        assert_eq!(nav.current(), 2);

        assert!(nav.go_previous());
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn navigator_progress() {
        let mut nav = Navigator::new(5);
        assert_eq!(nav.progress_percent(), 20);
        nav.go_next();
        nav.go_next();
        assert_eq!(nav.progress_percent(), 60);

        let mut nav = Navigator::new(3);
        assert_eq!(nav.progress_percent(), 33);
        nav.go_next();
        assert_eq!(nav.progress_percent(), 67);
    }

    #[test]
    fn single_question_is_first_and_last() {
        let mut nav = Navigator::new(1);
        assert!(nav.is_first());
        assert!(nav.is_last());
        assert!(!nav.go_next());
        assert_eq!(nav.current(), 0);
    }
}
