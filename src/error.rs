use std::path::PathBuf;

use thiserror::Error;

use crate::question::QuestionKind;

/// Problems with user-supplied input. Reported inline, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no question type selected, pick at least one")]
    NoQuestionTypes,
    #[error("question count must be between {min} and {max}, got {got}")]
    QuestionCountOutOfRange { got: usize, min: usize, max: usize },
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
    #[error("no questions match the selected types ({0})")]
    NoMatchingQuestions(String),
    #[error("question bank is empty")]
    EmptyBank,
    #[error("question id {0} appears more than once")]
    DuplicateQuestionId(u32),
    #[error("question {id} needs at least two options")]
    TooFewOptions { id: u32 },
    #[error("question {id}: correct answer {answer:?} is not one of its options")]
    CorrectAnswerNotAnOption { id: u32, answer: String },
    #[error("question index {index} is out of range for {len} questions")]
    QuestionIndexOutOfRange { index: usize, len: usize },
    #[error("option {index} is out of range for the {len} options of question {id}")]
    OptionIndexOutOfRange { id: u32, index: usize, len: usize },
    #[error("{value:?} is not an option of question {id}")]
    NotAnOption { id: u32, value: String },
    #[error("unknown question bank {0:?}")]
    UnknownBank(String),
}

impl ValidationError {
    pub fn no_matching(kinds: &[QuestionKind]) -> Self {
        let names = kinds
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ValidationError::NoMatchingQuestions(names)
    }
}

/// The results record is absent or unreadable. Recovered by redirecting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingState {
    #[error("no quiz results found")]
    Absent,
    #[error("stored quiz results are unreadable: {0}")]
    Corrupt(String),
}

/// The results record could not be stored for the results screen.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not encode results: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage full: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A submission was already started for this session.
    #[error("quiz already submitted")]
    SubmissionConflict,
    #[error("quiz session is not in progress")]
    NotInProgress,
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse question bank: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
