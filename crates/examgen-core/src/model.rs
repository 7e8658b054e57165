//! Core data model types for examgen.
//!
//! A [`Question`] is produced once by the parser and then copied into each
//! generated exam. [`ParsedDocument`] bundles the accepted questions with
//! their (type, difficulty) grid.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty tag of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    /// The three difficulties that own a bucket, in sampling order.
    pub const CONCRETE: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Short label used in exported documents.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Dễ",
            Difficulty::Medium => "TB",
            Difficulty::Hard => "Khó",
            Difficulty::Unknown => "Không rõ",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "dễ" => Ok(Difficulty::Easy),
            "medium" | "tb" | "trung bình" => Ok(Difficulty::Medium),
            "hard" | "khó" => Ok(Difficulty::Hard),
            "unknown" | "không rõ" => Ok(Difficulty::Unknown),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Whether a question tests theory or practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Theory,
    Practice,
    Unknown,
}

impl QuestionType {
    /// The two types that own a bucket, in sampling order.
    pub const CONCRETE: [QuestionType; 2] = [QuestionType::Theory, QuestionType::Practice];

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Theory => "LT",
            QuestionType::Practice => "TT",
            QuestionType::Unknown => "Không rõ",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Theory => write!(f, "theory"),
            QuestionType::Practice => write!(f, "practice"),
            QuestionType::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "theory" | "lt" | "lý thuyết" => Ok(QuestionType::Theory),
            "practice" | "tt" | "thực hành" => Ok(QuestionType::Practice),
            "unknown" | "không rõ" => Ok(QuestionType::Unknown),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt, with metadata tags stripped.
    pub text: String,
    /// Option letter → option text.
    pub options: BTreeMap<char, String>,
    /// Correct option letter, if one was marked or supplied.
    #[serde(default)]
    pub correct_answer: Option<char>,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
}

impl Question {
    /// A question is usable only with a non-empty prompt and at least two options.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.options.len() >= 2
    }

    /// The grid cell this question is sampled from.
    pub fn cell(&self) -> Cell {
        Cell::of(self)
    }
}

/// One (type, difficulty) pairing of the sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
}

impl Cell {
    /// Bucket placement for a question. Unknown type counts as Theory and
    /// unknown difficulty as Easy; the question itself keeps its tags.
    pub fn of(question: &Question) -> Self {
        let question_type = match question.question_type {
            QuestionType::Unknown => QuestionType::Theory,
            t => t,
        };
        let difficulty = match question.difficulty {
            Difficulty::Unknown => Difficulty::Easy,
            d => d,
        };
        Self {
            question_type,
            difficulty,
        }
    }

    /// All six concrete cells, Theory before Practice, Easy → Hard within each.
    pub fn all() -> impl Iterator<Item = Cell> {
        QuestionType::CONCRETE.into_iter().flat_map(|question_type| {
            Difficulty::CONCRETE.into_iter().map(move |difficulty| Cell {
                question_type,
                difficulty,
            })
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.question_type, self.difficulty)
    }
}

/// Questions of one type split by difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBuckets {
    pub easy: Vec<Question>,
    pub medium: Vec<Question>,
    pub hard: Vec<Question>,
}

impl DifficultyBuckets {
    pub fn get(&self, difficulty: Difficulty) -> &[Question] {
        match difficulty {
            Difficulty::Easy | Difficulty::Unknown => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn get_mut(&mut self, difficulty: Difficulty) -> &mut Vec<Question> {
        match difficulty {
            Difficulty::Easy | Difficulty::Unknown => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    pub fn total(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }
}

/// The fixed 2x3 grid of questions by type and difficulty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedPool {
    pub theory: DifficultyBuckets,
    pub practice: DifficultyBuckets,
}

impl CategorizedPool {
    /// Place a question in its cell.
    pub fn insert(&mut self, question: Question) {
        let cell = question.cell();
        self.buckets_mut(cell.question_type)
            .get_mut(cell.difficulty)
            .push(question);
    }

    pub fn buckets(&self, question_type: QuestionType) -> &DifficultyBuckets {
        match question_type {
            QuestionType::Theory | QuestionType::Unknown => &self.theory,
            QuestionType::Practice => &self.practice,
        }
    }

    fn buckets_mut(&mut self, question_type: QuestionType) -> &mut DifficultyBuckets {
        match question_type {
            QuestionType::Theory | QuestionType::Unknown => &mut self.theory,
            QuestionType::Practice => &mut self.practice,
        }
    }

    pub fn cell(&self, cell: Cell) -> &[Question] {
        self.buckets(cell.question_type).get(cell.difficulty)
    }

    pub fn type_total(&self, question_type: QuestionType) -> usize {
        self.buckets(question_type).total()
    }

    pub fn total(&self) -> usize {
        self.theory.total() + self.practice.total()
    }

    /// Stratified sampling needs at least one Theory and one Practice question.
    pub fn has_sufficient_categories(&self) -> bool {
        self.type_total(QuestionType::Theory) > 0 && self.type_total(QuestionType::Practice) > 0
    }
}

impl FromIterator<Question> for CategorizedPool {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        let mut pool = CategorizedPool::default();
        for question in iter {
            pool.insert(question);
        }
        pool
    }
}

/// All valid questions from one source document.
///
/// Deserializing keeps only `questions` and derives the rest, so a stale or
/// hand-edited grid in JSON never disagrees with the question list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuestionList")]
pub struct ParsedDocument {
    /// Accepted questions in source order.
    pub questions: Vec<Question>,
    pub total_questions: usize,
    /// Grid derived from `questions`.
    pub categorized: CategorizedPool,
}

impl ParsedDocument {
    /// Build a document, deriving the grid from the question list.
    pub fn new(questions: Vec<Question>) -> Self {
        let categorized = questions.iter().cloned().collect();
        Self {
            total_questions: questions.len(),
            questions,
            categorized,
        }
    }
}

#[derive(Deserialize)]
struct QuestionList {
    questions: Vec<Question>,
}

impl From<QuestionList> for ParsedDocument {
    fn from(list: QuestionList) -> Self {
        Self::new(list.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(difficulty: Difficulty, question_type: QuestionType) -> Question {
        Question {
            text: "What is TCP?".into(),
            options: BTreeMap::from([('A', "A protocol".into()), ('B', "A port".into())]),
            correct_answer: None,
            difficulty,
            question_type,
        }
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!("TB".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("Khó".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Trung bình".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn question_type_parse_accepts_vietnamese() {
        assert_eq!("lt".parse::<QuestionType>().unwrap(), QuestionType::Theory);
        assert_eq!(
            "Thực hành".parse::<QuestionType>().unwrap(),
            QuestionType::Practice
        );
        assert_eq!(QuestionType::Practice.label(), "TT");
    }

    #[test]
    fn validity_requires_text_and_two_options() {
        let mut q = question(Difficulty::Easy, QuestionType::Theory);
        assert!(q.is_valid());
        q.options.remove(&'B');
        assert!(!q.is_valid());
        let mut blank = question(Difficulty::Easy, QuestionType::Theory);
        blank.text = "   ".into();
        assert!(!blank.is_valid());
    }

    #[test]
    fn unknown_tags_bucket_under_theory_easy() {
        let q = question(Difficulty::Unknown, QuestionType::Unknown);
        let pool: CategorizedPool = vec![q.clone()].into_iter().collect();
        assert_eq!(pool.theory.easy.len(), 1);
        // The stored tags are left alone.
        assert_eq!(pool.theory.easy[0].difficulty, Difficulty::Unknown);
        assert_eq!(pool.theory.easy[0].question_type, QuestionType::Unknown);
        assert!(!pool.has_sufficient_categories());
    }

    #[test]
    fn cells_cover_grid_in_order() {
        let cells: Vec<String> = Cell::all().map(|c| c.to_string()).collect();
        assert_eq!(
            cells,
            vec![
                "theory/easy",
                "theory/medium",
                "theory/hard",
                "practice/easy",
                "practice/medium",
                "practice/hard"
            ]
        );
    }

    #[test]
    fn question_serde_roundtrip_keeps_letters() {
        let mut q = question(Difficulty::Hard, QuestionType::Practice);
        q.correct_answer = Some('B');
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn deserialized_document_rederives_its_grid() {
        let questions = vec![
            question(Difficulty::Hard, QuestionType::Practice),
            question(Difficulty::Easy, QuestionType::Theory),
        ];
        let json = serde_json::json!({
            "questions": questions,
            "total_questions": 99,
            "categorized": CategorizedPool::default(),
        });

        let doc: ParsedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc, ParsedDocument::new(questions));
        assert_eq!(doc.total_questions, 2);
        assert_eq!(doc.categorized.cell(Cell::of(&doc.questions[0])).len(), 1);
    }
}
