use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::results::ResultsRecord;

pub const EXPORT_FILE_NAME: &str = "quiz-results.txt";

/// Read-only view over a results record plus which explanations are open.
#[derive(Debug, Clone)]
pub struct ReviewState {
    record: ResultsRecord,
    expanded: BTreeSet<u32>,
    cursor: usize,
}

impl ReviewState {
    pub fn new(record: ResultsRecord) -> Self {
        Self {
            record,
            expanded: BTreeSet::new(),
            cursor: 0,
        }
    }

    pub fn record(&self) -> &ResultsRecord {
        &self.record
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Open or close the explanation of question `id`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: u32) {
        if !self.record.contains_question(id) {
            return;
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.record.questions.get(self.cursor).map(|q| q.id) {
            self.toggle(id);
        }
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.expanded.contains(&id)
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.record.questions.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}

/// Plain-text rendering of a results record.
pub fn export_text(record: &ResultsRecord) -> String {
    let mut out = String::from("Quiz Results\n\n");
    let _ = writeln!(
        out,
        "Score: {}/{} ({}%)\n",
        record.score,
        record.total_questions,
        record.percentage_score()
    );
    out.push_str("Questions:\n\n");

    for (i, outcome) in record.outcomes().enumerate() {
        let q = outcome.question;
        let _ = writeln!(out, "{}. {}", i + 1, q.prompt);
        let _ = writeln!(out, "Your answer: {}", outcome.given_or_placeholder());
        let _ = writeln!(out, "Correct answer: {}", q.correct_answer);
        let _ = writeln!(out, "Explanation: {}\n", q.explanation);
    }
    out
}

/// Write `quiz-results.txt` into `dir`, creating it if needed.
pub fn export_to_dir<P: AsRef<Path>>(record: &ResultsRecord, dir: P) -> io::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, export_text(record))?;
    tracing::info!(path = %path.display(), "results exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerSheet;
    use crate::question::fixtures::bank;
    use crate::scorer::score;

    fn record() -> ResultsRecord {
        let bank = bank(2);
        let mut sheet = AnswerSheet::new();
        sheet.select(1, "a");
        score(&bank, &sheet)
    }

    #[test]
    fn toggle_is_independent_per_question() {
        let mut review = ReviewState::new(record());
        review.toggle(1);
        review.toggle(2);
        review.toggle(1);
        assert!(!review.is_expanded(1));
        assert!(review.is_expanded(2));
        assert!(!review.is_expanded(3));
    }

    #[test]
    fn toggle_ignores_unknown_ids() {
        let mut review = ReviewState::new(record());
        review.toggle(99);
        assert!(!review.is_expanded(99));
        assert!(review.expanded.is_empty());
    }

    #[test]
    fn toggling_does_not_touch_score() {
        let mut review = ReviewState::new(record());
        let before = review.record().score;
        review.toggle(1);
        review.toggle(2);
        assert_eq!(review.record().score, before);
    }

    #[test]
    fn cursor_moves_within_questions() {
        let mut review = ReviewState::new(record());
        review.select_previous();
        assert_eq!(review.cursor(), 0);
        review.select_next();
        review.select_next();
        assert_eq!(review.cursor(), 1);
        review.toggle_selected();
        assert!(review.is_expanded(2));
    }

    #[test]
    fn export_text_layout() {
        let text = export_text(&record());
        let expected = "Quiz Results\n\n\
            Score: 1/2 (50%)\n\n\
            Questions:\n\n\
            1. question 1\n\
            Your answer: a\n\
            Correct answer: a\n\
            Explanation: because a\n\n\
            2. question 2\n\
            Your answer: Not answered\n\
            Correct answer: a\n\
            Explanation: because a\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_dir(&record(), dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Quiz Results\n\nScore: 1/2 (50%)"));
    }
}
