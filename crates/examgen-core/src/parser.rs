//! Question parser.
//!
//! Turns extracted quiz text into [`Question`] records with a single forward
//! pass. The accumulator is an explicit [`ParserState`]; each classified line
//! is one transition, and a finished question falls out whenever a new header
//! arrives or input ends.

use std::collections::BTreeMap;

use crate::classifier::{classify_line, LineKind};
use crate::error::ExamError;
use crate::model::{CategorizedPool, Difficulty, ParsedDocument, Question, QuestionType};

/// A question whose lines are still being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: BTreeMap<char, String>,
    pub correct_answer: Option<char>,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    /// Lines that arrived after the options began. Kept for inspection, never
    /// folded into the prompt or an option.
    pub trailing: Vec<String>,
}

impl QuestionDraft {
    fn new(text: String, difficulty: Difficulty, question_type: QuestionType) -> Self {
        Self {
            text,
            options: BTreeMap::new(),
            correct_answer: None,
            difficulty,
            question_type,
            trailing: Vec::new(),
        }
    }

    /// Convert to a [`Question`] if it passes the validity rule.
    pub fn into_question(self) -> Option<Question> {
        let question = Question {
            text: self.text.trim().to_string(),
            options: self.options,
            correct_answer: self.correct_answer,
            difficulty: self.difficulty,
            question_type: self.question_type,
        };
        question.is_valid().then_some(question)
    }
}

/// Parser state between lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParserState {
    /// No header seen yet; option, answer and continuation lines are ignored.
    #[default]
    Idle,
    Building(QuestionDraft),
}

impl ParserState {
    /// Apply one classified line. Returns the previous question when a new
    /// header commits it and it is valid.
    pub fn step(&mut self, line: LineKind) -> Option<Question> {
        match line {
            LineKind::Header {
                text,
                difficulty,
                question_type,
                ..
            } => {
                let draft = QuestionDraft::new(text, difficulty, question_type);
                match std::mem::replace(self, ParserState::Building(draft)) {
                    ParserState::Building(previous) => previous.into_question(),
                    ParserState::Idle => None,
                }
            }
            LineKind::OptionLine {
                letter,
                text,
                marked_correct,
            } => {
                if let ParserState::Building(draft) = self {
                    draft.options.insert(letter, text);
                    if marked_correct {
                        draft.correct_answer = Some(letter);
                    }
                }
                None
            }
            LineKind::AnswerDeclaration { letter } => {
                if let ParserState::Building(draft) = self {
                    draft.correct_answer = Some(letter);
                }
                None
            }
            LineKind::Continuation(text) => {
                if let ParserState::Building(draft) = self {
                    if draft.options.is_empty() {
                        if !draft.text.is_empty() {
                            draft.text.push(' ');
                        }
                        draft.text.push_str(&text);
                    } else {
                        draft.trailing.push(text);
                    }
                }
                None
            }
        }
    }

    /// End of input: commit whatever is in progress.
    pub fn finish(self) -> Option<Question> {
        match self {
            ParserState::Building(draft) => draft.into_question(),
            ParserState::Idle => None,
        }
    }
}

/// Parse trimmed, non-blank lines into valid questions, in source order.
///
/// Blocks that never reach a prompt and two options are dropped silently.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Question> {
    let mut state = ParserState::default();
    let mut questions = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(question) = state.step(classify_line(line)) {
            questions.push(question);
        }
    }

    if let Some(question) = state.finish() {
        questions.push(question);
    }

    questions
}

/// Split questions into the 2x3 (type, difficulty) grid.
pub fn categorize(questions: &[Question]) -> CategorizedPool {
    questions.iter().cloned().collect()
}

/// Normalize raw extracted text into trimmed, non-blank lines.
pub fn normalize_lines(content: &str) -> Vec<&str> {
    content
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse a whole document.
///
/// Fails with [`ExamError::NoQuestionsFound`] when nothing valid remains.
pub fn parse_document(content: &str) -> Result<ParsedDocument, ExamError> {
    let lines = normalize_lines(content);
    let questions = parse_lines(&lines);

    if questions.is_empty() {
        return Err(ExamError::NoQuestionsFound);
    }

    tracing::debug!(
        "parsed {} questions from {} lines",
        questions.len(),
        lines.len()
    );

    Ok(ParsedDocument::new(questions))
}

/// An advisory issue with raw document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWarning {
    pub message: String,
}

/// Check raw content for the shape of a quiz document before parsing.
///
/// Warnings never block parsing; they only explain an empty result.
pub fn validate_content(content: &str) -> Vec<ContentWarning> {
    let mut warnings = Vec::new();
    let lines = normalize_lines(content);

    let has_header = lines
        .iter()
        .any(|l| matches!(classify_line(l), LineKind::Header { .. }));
    if !has_header {
        warnings.push(ContentWarning {
            message: "no \"Câu <n>\" question headers found".into(),
        });
    }

    let has_option = lines
        .iter()
        .any(|l| matches!(classify_line(l), LineKind::OptionLine { .. }));
    if !has_option {
        warnings.push(ContentWarning {
            message: "no A./B./C./D. option lines found".into(),
        });
    }

    if content.chars().count() < 100 {
        warnings.push(ContentWarning {
            message: "content is too short to hold a question set".into(),
        });
    }

    warnings
}
