//! Exam generator.
//!
//! Samples the parsed question pool into independent exam versions. Each
//! version draws from the (type, difficulty) grid in proportion to the
//! settings, fills any shortfall from the whole pool, shuffles, and gets its
//! own copies of the questions so answer overlays never leak between
//! versions or back into the pool.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::AnswerKey;
use crate::error::ExamError;
use crate::model::{Cell, Difficulty, ParsedDocument, Question, QuestionType};
use crate::report::{ExamGenerationResult, SourceStats};

/// Caller-supplied generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSettings {
    /// Questions per exam.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Number of exam versions (1..=100).
    #[serde(default = "default_version_count")]
    pub version_count: usize,
    #[serde(default = "default_easy_percent")]
    pub easy_percent: u32,
    #[serde(default = "default_medium_percent")]
    pub medium_percent: u32,
    #[serde(default = "default_hard_percent")]
    pub hard_percent: u32,
    /// Fraction of each exam that should be Theory.
    #[serde(default = "default_theory_ratio")]
    pub theory_ratio: f64,
}

fn default_question_count() -> usize {
    20
}
fn default_version_count() -> usize {
    3
}
fn default_easy_percent() -> u32 {
    40
}
fn default_medium_percent() -> u32 {
    40
}
fn default_hard_percent() -> u32 {
    20
}
fn default_theory_ratio() -> f64 {
    0.5
}

/// Upper bound on versions per generation call.
pub const MAX_VERSIONS: usize = 100;

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            version_count: default_version_count(),
            easy_percent: default_easy_percent(),
            medium_percent: default_medium_percent(),
            hard_percent: default_hard_percent(),
            theory_ratio: default_theory_ratio(),
        }
    }
}

impl ExamSettings {
    /// Percentage configured for a concrete difficulty.
    pub fn percent_for(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy_percent,
            Difficulty::Medium => self.medium_percent,
            Difficulty::Hard => self.hard_percent,
            Difficulty::Unknown => 0,
        }
    }

    /// Caller-side checks. The generator itself trusts its settings.
    pub fn validate(&self) -> Result<(), ExamError> {
        if self.question_count == 0 {
            return Err(ExamError::InvalidSettings(
                "question count must be at least 1".into(),
            ));
        }
        if !(1..=MAX_VERSIONS).contains(&self.version_count) {
            return Err(ExamError::InvalidSettings(format!(
                "version count must be between 1 and {MAX_VERSIONS}, got {}",
                self.version_count
            )));
        }
        let sum = self.easy_percent + self.medium_percent + self.hard_percent;
        if sum != 100 {
            return Err(ExamError::InvalidSettings(format!(
                "difficulty percentages must sum to 100, got {sum}"
            )));
        }
        if !(0.0..=1.0).contains(&self.theory_ratio) {
            return Err(ExamError::InvalidSettings(format!(
                "theory ratio must be between 0 and 1, got {}",
                self.theory_ratio
            )));
        }
        Ok(())
    }
}

/// Difficulty tally of one exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

/// Type tally of one exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub theory: usize,
    pub practice: usize,
}

/// Counts derived from an exam's final question list.
///
/// Questions tagged Unknown are tallied under their bucket default (Easy,
/// Theory) so both tallies always add up to `total_questions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamMetadata {
    pub total_questions: usize,
    pub difficulty: DifficultyCounts,
    pub question_type: TypeCounts,
}

impl ExamMetadata {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut metadata = ExamMetadata {
            total_questions: questions.len(),
            ..Default::default()
        };
        for question in questions {
            let cell = Cell::of(question);
            match cell.difficulty {
                Difficulty::Medium => metadata.difficulty.medium += 1,
                Difficulty::Hard => metadata.difficulty.hard += 1,
                Difficulty::Easy | Difficulty::Unknown => metadata.difficulty.easy += 1,
            }
            match cell.question_type {
                QuestionType::Practice => metadata.question_type.practice += 1,
                QuestionType::Theory | QuestionType::Unknown => {
                    metadata.question_type.theory += 1
                }
            }
        }
        metadata
    }
}

/// One sampled and shuffled exam version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedExam {
    pub id: String,
    /// 1-based version number.
    pub version: usize,
    pub questions: Vec<Question>,
    pub metadata: ExamMetadata,
    pub created_at: DateTime<Utc>,
}

/// Stratified exam sampler.
///
/// Holds nothing but its random source; construct one per call site.
pub struct ExamGenerator<R = ThreadRng> {
    rng: R,
}

impl ExamGenerator<ThreadRng> {
    /// Generator backed by the thread-local random source.
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ExamGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ExamGenerator<R> {
    /// Generator backed by a caller-provided random source, e.g. a seeded
    /// `StdRng` for reproducible output.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `settings.version_count` exams from the document's pool.
    ///
    /// `answers` overlays correct letters by 1-based position onto every
    /// version's own copies.
    pub fn generate_exams(
        &mut self,
        doc: &ParsedDocument,
        settings: &ExamSettings,
        answers: Option<&AnswerKey>,
    ) -> Result<ExamGenerationResult, ExamError> {
        let pool = &doc.questions;
        if pool.is_empty() {
            return Err(ExamError::EmptyPool);
        }
        if settings.question_count > pool.len() {
            return Err(ExamError::InsufficientQuestions {
                available: pool.len(),
                requested: settings.question_count,
            });
        }

        let cells = CellIndex::build(pool);
        let exams = (1..=settings.version_count)
            .map(|version| self.generate_single(pool, &cells, settings, version, answers))
            .collect();

        Ok(ExamGenerationResult {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            exams,
            settings: settings.clone(),
            source_stats: SourceStats {
                total_questions: pool.len(),
                categorized: pool.iter().cloned().collect(),
            },
        })
    }

    /// A single-version preview, or `None` if generation is impossible.
    pub fn generate_preview(
        &mut self,
        doc: &ParsedDocument,
        settings: &ExamSettings,
    ) -> Option<GeneratedExam> {
        let settings = ExamSettings {
            version_count: 1,
            ..settings.clone()
        };
        match self.generate_exams(doc, &settings, None) {
            Ok(result) => result.exams.into_iter().next(),
            Err(e) => {
                tracing::debug!("preview unavailable: {e}");
                None
            }
        }
    }

    fn generate_single(
        &mut self,
        pool: &[Question],
        cells: &CellIndex,
        settings: &ExamSettings,
        version: usize,
        answers: Option<&AnswerKey>,
    ) -> GeneratedExam {
        let target = settings.question_count;

        let mut selected = if cells.has_sufficient_categories() {
            self.select_stratified(pool.len(), cells, settings)
        } else {
            tracing::debug!("version {version}: one type group is empty, sampling uniformly");
            let all: Vec<usize> = (0..pool.len()).collect();
            self.draw(&all, target)
        };

        selected.shuffle(&mut self.rng);
        selected.truncate(target);

        let mut questions: Vec<Question> = selected.iter().map(|&i| pool[i].clone()).collect();

        if let Some(answers) = answers {
            for (position, letter) in answers.iter() {
                if let Some(question) = position
                    .checked_sub(1)
                    .and_then(|index| questions.get_mut(index))
                {
                    question.correct_answer = Some(letter);
                }
            }
        }

        let metadata = ExamMetadata::from_questions(&questions);
        tracing::debug!(
            "version {version}: {} questions ({} easy, {} medium, {} hard)",
            metadata.total_questions,
            metadata.difficulty.easy,
            metadata.difficulty.medium,
            metadata.difficulty.hard
        );

        GeneratedExam {
            id: format!("exam-{version}-{}", Uuid::new_v4().simple()),
            version,
            questions,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Per-cell draws, then top-up from the whole pool.
    fn select_stratified(
        &mut self,
        pool_len: usize,
        cells: &CellIndex,
        settings: &ExamSettings,
    ) -> Vec<usize> {
        let target = settings.question_count;
        let theory = (target as f64 * settings.theory_ratio).round() as usize;
        let practice = target.saturating_sub(theory);

        let mut selected = Vec::with_capacity(target + 2);
        for (question_type, count) in [
            (QuestionType::Theory, theory),
            (QuestionType::Practice, practice),
        ] {
            for difficulty in Difficulty::CONCRETE {
                let percent = settings.percent_for(difficulty) as f64 / 100.0;
                let needed = (count as f64 * percent).round() as usize;
                let cell = Cell {
                    question_type,
                    difficulty,
                };
                selected.extend(self.draw(cells.get(cell), needed));
            }
        }

        if selected.len() < target {
            let taken: HashSet<usize> = selected.iter().copied().collect();
            let remaining: Vec<usize> = (0..pool_len).filter(|i| !taken.contains(i)).collect();
            let shortfall = target - selected.len();
            selected.extend(self.draw(&remaining, shortfall));
        }

        selected
    }

    /// Up to `needed` items, uniformly without replacement. Takes everything
    /// when the source is not larger than `needed`.
    fn draw(&mut self, source: &[usize], needed: usize) -> Vec<usize> {
        let mut drawn = source.to_vec();
        if drawn.len() > needed {
            drawn.shuffle(&mut self.rng);
            drawn.truncate(needed);
        }
        drawn
    }
}

/// Pool indices per grid cell.
struct CellIndex {
    cells: Vec<(Cell, Vec<usize>)>,
}

impl CellIndex {
    fn build(pool: &[Question]) -> Self {
        let mut cells: Vec<(Cell, Vec<usize>)> = Cell::all().map(|c| (c, Vec::new())).collect();
        for (index, question) in pool.iter().enumerate() {
            let cell = Cell::of(question);
            if let Some((_, indices)) = cells.iter_mut().find(|(c, _)| *c == cell) {
                indices.push(index);
            }
        }
        Self { cells }
    }

    fn get(&self, cell: Cell) -> &[usize] {
        self.cells
            .iter()
            .find(|(c, _)| *c == cell)
            .map(|(_, indices)| indices.as_slice())
            .unwrap_or_default()
    }

    fn type_total(&self, question_type: QuestionType) -> usize {
        self.cells
            .iter()
            .filter(|(c, _)| c.question_type == question_type)
            .map(|(_, indices)| indices.len())
            .sum()
    }

    fn has_sufficient_categories(&self) -> bool {
        self.type_total(QuestionType::Theory) > 0 && self.type_total(QuestionType::Practice) > 0
    }
}
