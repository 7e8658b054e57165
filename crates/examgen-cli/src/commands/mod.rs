pub mod generate;
pub mod init;
pub mod parse;
pub mod preview;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use examgen_core::{ExamGenerator, ExamSettings};

/// Command-line overrides for `[exam]` settings.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Questions per exam
    #[arg(long)]
    pub questions: Option<usize>,

    /// Number of exam versions (1-100)
    #[arg(long)]
    pub versions: Option<usize>,

    /// Percentage of easy questions
    #[arg(long)]
    pub easy: Option<u32>,

    /// Percentage of medium questions
    #[arg(long)]
    pub medium: Option<u32>,

    /// Percentage of hard questions
    #[arg(long)]
    pub hard: Option<u32>,

    /// Fraction of theory questions (0.0-1.0)
    #[arg(long)]
    pub theory_ratio: Option<f64>,
}

impl SettingsArgs {
    pub fn apply(&self, settings: &mut ExamSettings) {
        if let Some(v) = self.questions {
            settings.question_count = v;
        }
        if let Some(v) = self.versions {
            settings.version_count = v;
        }
        if let Some(v) = self.easy {
            settings.easy_percent = v;
        }
        if let Some(v) = self.medium {
            settings.medium_percent = v;
        }
        if let Some(v) = self.hard {
            settings.hard_percent = v;
        }
        if let Some(v) = self.theory_ratio {
            settings.theory_ratio = v;
        }
    }
}

/// Read a question bank. `.docx` files go through the document reader,
/// anything else is read as UTF-8 text.
pub fn read_input(path: &Path) -> Result<String> {
    let is_docx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));

    if is_docx {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        examgen_export::read_docx_text(&bytes)
            .with_context(|| format!("failed to extract text from {}", path.display()))
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Seeded generator when `seed` is given, OS-seeded otherwise.
pub fn generator(seed: Option<u64>) -> ExamGenerator<StdRng> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    ExamGenerator::with_rng(rng)
}
