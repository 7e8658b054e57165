//! Error types for parsing and exam generation.
//!
//! Individual malformed lines are never errors; the parser filters them out.
//! These variants cover the conditions that abort a whole call.

use thiserror::Error;

/// Errors raised by the parser, the generator, and their input helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// Parsing finished without a single valid question.
    #[error("no questions found; check that the document uses \"Câu <n>\" headers and A./B. options")]
    NoQuestionsFound,

    /// The generator was handed an empty question pool.
    #[error("question pool is empty, nothing to generate from")]
    EmptyPool,

    /// More questions were requested per exam than the pool holds.
    #[error("not enough questions: pool has {available}, requested {requested}")]
    InsufficientQuestions { available: usize, requested: usize },

    /// An answer-key entry did not look like `1A` or `Câu 1A`.
    #[error("invalid answer key entry \"{0}\", expected a form like 1A,2B,3C")]
    InvalidAnswerKey(String),

    /// Exam settings failed caller-side validation.
    #[error("invalid exam settings: {0}")]
    InvalidSettings(String),
}

impl ExamError {
    /// Returns `true` if retrying with a smaller `question_count` could succeed.
    pub fn is_recoverable_by_fewer_questions(&self) -> bool {
        matches!(self, ExamError::InsufficientQuestions { .. })
    }
}
