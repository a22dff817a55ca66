use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::question::QuestionKind;

pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 20;
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 600;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Everything the user picks before a quiz starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub question_count: usize,
    pub difficulty: Difficulty,
    pub question_types: Vec<QuestionKind>,
    pub time_limit_secs: u64,
    pub shuffle: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: 5,
            difficulty: Difficulty::Medium,
            question_types: vec![QuestionKind::MultipleChoice],
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            shuffle: false,
        }
    }
}

impl QuizSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question_types.is_empty() {
            return Err(ValidationError::NoQuestionTypes);
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.question_count) {
            return Err(ValidationError::QuestionCountOutOfRange {
                got: self.question_count,
                min: MIN_QUESTIONS,
                max: MAX_QUESTIONS,
            });
        }
        if self.time_limit_secs == 0 {
            return Err(ValidationError::ZeroTimeLimit);
        }
        Ok(())
    }

    /// Add the kind if absent, remove it if present.
    pub fn toggle_type(&mut self, kind: QuestionKind) {
        if let Some(pos) = self.question_types.iter().position(|k| *k == kind) {
            self.question_types.remove(pos);
        } else {
            self.question_types.push(kind);
        }
    }
}
