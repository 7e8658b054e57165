//! Externally supplied answer keys.
//!
//! When a source document carries no answer markers, the caller can supply
//! answers by exam position. The generator overlays them onto each exam's own
//! copy of the questions.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExamError;

static ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*([A-D])$").expect("entry pattern is valid"));

static POSITION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)câu\s*").expect("prefix pattern is valid"));

/// Position (1-based) → correct option letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey(BTreeMap<usize, char>);

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: usize, letter: char) {
        self.0.insert(position, letter.to_ascii_uppercase());
    }

    pub fn get(&self, position: usize) -> Option<char> {
        self.0.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.0.iter().map(|(p, l)| (*p, *l))
    }
}

impl FromIterator<(usize, char)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (usize, char)>>(iter: I) -> Self {
        let mut key = AnswerKey::new();
        for (position, letter) in iter {
            key.insert(position, letter);
        }
        key
    }
}

/// Parse `1A,2B,3C` or `Câu 1A, Câu 2B` into an [`AnswerKey`].
///
/// Blank input yields an empty key. Position 0 is rejected since positions
/// are 1-based.
pub fn parse_answer_key(input: &str) -> Result<AnswerKey, ExamError> {
    let cleaned = POSITION_PREFIX.replace_all(input.trim(), "");
    let mut key = AnswerKey::new();

    for entry in cleaned.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let caps = ENTRY_PATTERN
            .captures(entry)
            .ok_or_else(|| ExamError::InvalidAnswerKey(entry.to_string()))?;
        let position: usize = caps[1]
            .parse()
            .map_err(|_| ExamError::InvalidAnswerKey(entry.to_string()))?;
        if position == 0 {
            return Err(ExamError::InvalidAnswerKey(entry.to_string()));
        }
        let letter = caps[2].chars().next().unwrap_or('A');
        key.insert(position, letter);
    }

    Ok(key)
}
