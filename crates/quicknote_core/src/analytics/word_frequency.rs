//! Word-frequency statistics for note bodies.
//!
//! # Responsibility
//! - Tokenize text into lower-cased words split on non-letter runs.
//! - Count occurrences and order them by descending count.
//!
//! # Invariants
//! - Tokens contain letters only (`\p{L}`); digits, punctuation, symbols and
//!   whitespace all separate words.
//! - Equal counts keep first-appearance order from the source text.
//! - Blank or letter-free input yields an empty result, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

static WORD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\P{L}+").expect("valid word separator regex"));

/// Ordered word -> count mapping, highest count first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequency {
    entries: Vec<(String, u64)>,
}

impl WordFrequency {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for `word`; lookups are exact (pass lower-case words).
    pub fn get(&self, word: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == word)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }

    /// Words in result order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(word, _)| word.as_str())
    }

    pub fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }
}

impl Serialize for WordFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (word, count) in &self.entries {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// Computes word frequencies for `text`.
pub fn analyze_word_frequency(text: &str) -> WordFrequency {
    if text.trim().is_empty() {
        return WordFrequency::default();
    }

    let lowered = text.to_lowercase();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(String, u64)> = Vec::new();

    for word in WORD_SEPARATOR_RE
        .split(&lowered)
        .filter(|word| !word.is_empty())
    {
        match positions.get(word) {
            Some(&idx) => entries[idx].1 += 1,
            None => {
                positions.insert(word, entries.len());
                entries.push((word.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    entries.sort_by(|left, right| right.1.cmp(&left.1));
    WordFrequency { entries }
}
