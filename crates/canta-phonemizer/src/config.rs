//! Singer configuration.
//!
//! A singer directory carries a `singer.toml` describing where the rule
//! files live plus the symbol inventory and redirection rules. Rule files
//! themselves (question set, phoneme table, scaler statistics) keep their
//! external formats and are loaded by their own modules.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use canta_score::SymbolKind;

/// Default lead-in before the first note, reserved for leading consonants.
pub const DEFAULT_PADDING_MS: i32 = 500;

/// One context-sensitive output-symbol substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectionRule {
    /// Phoneme run to match, in order.
    pub from: Vec<String>,
    /// Output symbol the run collapses to.
    pub to: String,
}

/// Phoneme classification sets for this singer.
///
/// Defaults cover the Japanese NNSVS convention the duration models in the
/// wild are trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolInventory {
    pub vowels: Vec<String>,
    pub pauses: Vec<String>,
    pub silences: Vec<String>,
    pub breaks: Vec<String>,
    pub default_pause: String,
    pub default_silence: String,
}

impl Default for SymbolInventory {
    fn default() -> Self {
        Self {
            vowels: ["a", "i", "u", "e", "o", "A", "I", "U", "E", "O", "N", "ae", "AE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pauses: vec!["pau".to_string()],
            silences: vec!["sil".to_string()],
            breaks: vec!["br".to_string(), "cl".to_string()],
            default_pause: "pau".to_string(),
            default_silence: "sil".to_string(),
        }
    }
}

impl SymbolInventory {
    /// Classify a symbol. Anything not in a named set is a consonant.
    pub fn classify(&self, symbol: &str) -> SymbolKind {
        if self.vowels.iter().any(|s| s == symbol) {
            SymbolKind::Vowel
        } else if self.pauses.iter().any(|s| s == symbol) {
            SymbolKind::Pause
        } else if self.silences.iter().any(|s| s == symbol) {
            SymbolKind::Silence
        } else if self.breaks.iter().any(|s| s == symbol) {
            SymbolKind::Break
        } else {
            SymbolKind::Consonant
        }
    }

    /// All symbols named by the inventory itself.
    pub fn known_symbols(&self) -> HashSet<String> {
        self.vowels
            .iter()
            .chain(&self.pauses)
            .chain(&self.silences)
            .chain(&self.breaks)
            .cloned()
            .collect()
    }
}

/// Singer configuration loaded from `singer.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingerConfig {
    /// Question set file, relative to the singer directory.
    pub question_path: PathBuf,
    /// Phoneme table (`.table` or `.conf`), relative to the singer directory.
    pub table_path: PathBuf,
    /// Directory holding scaler statistics files.
    #[serde(default = "default_stats_dir")]
    pub stats_dir: PathBuf,
    /// Lead-in before the first note in milliseconds.
    #[serde(default = "default_padding_ms")]
    pub padding_ms: i32,
    #[serde(default)]
    pub symbols: SymbolInventory,
    #[serde(default)]
    pub redirections: Vec<RedirectionRule>,
}

fn default_stats_dir() -> PathBuf {
    PathBuf::from("stats")
}

fn default_padding_ms() -> i32 {
    DEFAULT_PADDING_MS
}

impl SingerConfig {
    /// Load a singer config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse a singer config from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve a config-relative path against the singer directory.
    pub fn resolve(&self, root: &Path, relative: &Path) -> PathBuf {
        root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let config = SingerConfig::parse(
            r#"
            question_path = "hed/questions.hed"
            table_path = "dic/japanese.table"
            "#,
        )
        .unwrap();
        assert_eq!(config.padding_ms, 500);
        assert_eq!(config.stats_dir, PathBuf::from("stats"));
        assert!(config.redirections.is_empty());
        assert_eq!(config.symbols.default_pause, "pau");
    }

    #[test]
    fn test_parse_full() {
        let config = SingerConfig::parse(
            r#"
            question_path = "questions.hed"
            table_path = "dict.table"
            stats_dir = "norm"
            padding_ms = 300

            [symbols]
            vowels = ["a", "i"]
            default_pause = "sp"

            [[redirections]]
            from = ["hh", "a"]
            to = "ha"
            "#,
        )
        .unwrap();
        assert_eq!(config.padding_ms, 300);
        assert_eq!(config.symbols.vowels, vec!["a", "i"]);
        assert_eq!(config.symbols.default_pause, "sp");
        assert_eq!(config.redirections.len(), 1);
        assert_eq!(config.redirections[0].to, "ha");
    }

    #[test]
    fn test_classify_defaults() {
        let inventory = SymbolInventory::default();
        assert_eq!(inventory.classify("a"), SymbolKind::Vowel);
        assert_eq!(inventory.classify("k"), SymbolKind::Consonant);
        assert_eq!(inventory.classify("pau"), SymbolKind::Pause);
        assert_eq!(inventory.classify("sil"), SymbolKind::Silence);
        assert_eq!(inventory.classify("br"), SymbolKind::Break);
        assert_eq!(inventory.classify("cl"), SymbolKind::Break);
    }
}
