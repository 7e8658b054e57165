//! `examgen.toml` configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::generator::ExamSettings;

/// `${NAME}` references, expanded in a single pass.
static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("env var pattern is valid"));

/// Document format for exported exams and answer sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Txt,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "docx" | "word" => Ok(ExportFormat::Docx),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// How generated exams are packaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub format: ExportFormat,
    /// Mark the correct option in single-exam exports.
    #[serde(default)]
    pub include_answers: bool,
    /// Write one answer sheet per exam under `dap-an/`.
    #[serde(default = "default_true")]
    pub separate_answer_sheet: bool,
    /// Write `ThongKe.txt` with per-version statistics.
    #[serde(default = "default_true")]
    pub include_statistics: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./examgen-output")
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            include_answers: false,
            separate_answer_sheet: true,
            include_statistics: true,
            output_dir: default_output_dir(),
        }
    }
}

/// Top-level examgen configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamgenConfig {
    #[serde(default)]
    pub exam: ExamSettings,
    #[serde(default)]
    pub export: ExportOptions,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    ENV_VAR
        .replace_all(s, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examgen.toml` in the current directory
/// 2. `~/.config/examgen/config.toml`
///
/// `EXAMGEN_OUTPUT_DIR` overrides the export directory.
pub fn load_config() -> Result<ExamgenConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examgen.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamgenConfig::default(),
    };

    if let Ok(dir) = std::env::var("EXAMGEN_OUTPUT_DIR") {
        config.export.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML string into a config, expanding `${VAR}` in `output_dir`.
pub fn parse_config_str(content: &str) -> Result<ExamgenConfig> {
    let mut config: ExamgenConfig = toml::from_str(content)?;
    let raw = config.export.output_dir.to_string_lossy().into_owned();
    config.export.output_dir = PathBuf::from(resolve_env_vars(&raw));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examgen"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMGEN_TEST_VAR", "exams");
        assert_eq!(resolve_env_vars("${_EXAMGEN_TEST_VAR}"), "exams");
        assert_eq!(
            resolve_env_vars("/tmp/${_EXAMGEN_TEST_VAR}/out"),
            "/tmp/exams/out"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_EXAMGEN_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_substituted_values() {
        std::env::set_var("_EXAMGEN_SELF_VAR", "${_EXAMGEN_SELF_VAR}");
        std::env::set_var("_EXAMGEN_NESTED_VAR", "${_EXAMGEN_SELF_VAR}/nested");
        assert_eq!(
            resolve_env_vars("${_EXAMGEN_SELF_VAR}/out"),
            "${_EXAMGEN_SELF_VAR}/out"
        );
        assert_eq!(
            resolve_env_vars("${_EXAMGEN_NESTED_VAR}"),
            "${_EXAMGEN_SELF_VAR}/nested"
        );
        std::env::remove_var("_EXAMGEN_SELF_VAR");
        std::env::remove_var("_EXAMGEN_NESTED_VAR");
    }

    #[test]
    fn resolve_env_vars_unset_is_empty() {
        std::env::remove_var("_EXAMGEN_UNSET_VAR");
        assert_eq!(resolve_env_vars("a${_EXAMGEN_UNSET_VAR}b"), "ab");
    }

    #[test]
    fn default_config() {
        let config = ExamgenConfig::default();
        assert_eq!(config.exam.question_count, 20);
        assert_eq!(config.exam.version_count, 3);
        assert_eq!(config.export.format, ExportFormat::Txt);
        assert!(config.export.separate_answer_sheet);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str(
            r#"
[exam]
question_count = 40
easy_percent = 30
medium_percent = 50
hard_percent = 20

[export]
format = "docx"
include_answers = true
"#,
        )
        .unwrap();
        assert_eq!(config.exam.question_count, 40);
        assert_eq!(config.exam.version_count, 3);
        assert_eq!(config.exam.theory_ratio, 0.5);
        assert_eq!(config.export.format, ExportFormat::Docx);
        assert!(config.export.include_answers);
        assert!(config.export.include_statistics);
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examgen.toml");
        std::fs::write(&path, "[exam]\nversion_count = 7\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.exam.version_count, 7);
    }

    #[test]
    fn export_format_parse() {
        assert_eq!("DOCX".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Docx.to_string(), "docx");
    }
}
