//! examgen-core: question parsing and stratified exam generation.
//!
//! This crate turns extracted quiz text into typed questions and samples
//! them into balanced, shuffled exam versions. It is synchronous and never
//! touches the network; only `config` and `report` read or write files.

pub mod answers;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod report;
pub mod statistics;

pub use answers::{parse_answer_key, AnswerKey};
pub use error::ExamError;
pub use generator::{ExamGenerator, ExamSettings, GeneratedExam};
pub use model::{Difficulty, ParsedDocument, Question, QuestionType};
pub use parser::parse_document;
pub use report::ExamGenerationResult;
