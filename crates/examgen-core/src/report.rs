//! Generation result types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generator::{ExamSettings, GeneratedExam};
use crate::model::CategorizedPool;

/// Everything one generation call produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamGenerationResult {
    /// Unique identifier of this generation call.
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// One exam per version, in version order.
    pub exams: Vec<GeneratedExam>,
    /// The settings the exams were drawn with.
    pub settings: ExamSettings,
    pub source_stats: SourceStats,
}

/// Snapshot of the pool the exams were drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub total_questions: usize,
    pub categorized: CategorizedPool,
}

impl ExamGenerationResult {
    /// Save the result as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: ExamGenerationResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }

    /// The exam with the given 1-based version number.
    pub fn exam(&self, version: usize) -> Option<&GeneratedExam> {
        self.exams.iter().find(|e| e.version == version)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::generator::ExamGenerator;
    use crate::parser::parse_document;

    const SOURCE: &str = "\
Câu 1: Which layer routes packets? (TB) (LT)
A. Network
B. Physical
Câu 2: Which command lists files? (Dễ) (TT)
A. ls
*B. cd
Câu 3: What does ARP map? (Khó) (LT)
A. IP to MAC
B. MAC to port
";

    fn make_result() -> ExamGenerationResult {
        let doc = parse_document(SOURCE).unwrap();
        let settings = ExamSettings {
            question_count: 3,
            version_count: 2,
            ..ExamSettings::default()
        };
        ExamGenerator::with_rng(StdRng::seed_from_u64(1))
            .generate_exams(&doc, &settings, None)
            .unwrap()
    }

    #[test]
    fn json_roundtrip() {
        let result = make_result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.json");

        result.save_json(&path).unwrap();
        let loaded = ExamGenerationResult::load_json(&path).unwrap();

        assert_eq!(loaded, result);
        assert_eq!(loaded.source_stats.total_questions, 3);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExamGenerationResult::load_json(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn exam_lookup_by_version() {
        let result = make_result();
        assert_eq!(result.exam(2).map(|e| e.version), Some(2));
        assert!(result.exam(3).is_none());
    }
}
