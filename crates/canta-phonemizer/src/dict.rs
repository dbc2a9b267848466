//! G2P dictionary built from singer-bank phoneme table files.
//!
//! Two table formats exist in the wild:
//! - `.table`: one `grapheme phoneme phoneme ...` entry per line, whitespace
//!   separated.
//! - `.conf`: `KEY="a,b,c"` lines, with implicit `SILENCES`/`PAUSES`/`BREAK`
//!   defaults.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::config::SymbolInventory;
use crate::error::{Error, Result};
use canta_score::{G2p, SymbolKind};

/// In-memory G2P dictionary with symbol classification.
#[derive(Debug, Clone, Default)]
pub struct TableG2p {
    entries: HashMap<String, Vec<String>>,
    symbols: HashMap<String, SymbolKind>,
}

impl TableG2p {
    /// Load a phoneme table, dispatching on the file extension.
    pub fn load(path: &Path, inventory: &SymbolInventory) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "conf") {
            Self::parse_conf(&text, inventory)
        } else {
            Self::parse_table(&text, inventory)
        }
    }

    /// Parse the whitespace `.table` format.
    pub fn parse_table(text: &str, inventory: &SymbolInventory) -> Result<Self> {
        let mut dict = Self::default();
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let Some(grapheme) = fields.next() else {
                continue;
            };
            let phonemes: Vec<String> = fields.map(str::to_string).collect();
            if phonemes.is_empty() {
                return Err(Error::PhonemeTable(line.to_string()));
            }
            dict.add_entry(grapheme, phonemes, inventory);
        }
        dict.register_inventory(inventory);
        Ok(dict)
    }

    /// Parse the `KEY="a,b,c"` `.conf` format.
    pub fn parse_conf(text: &str, inventory: &SymbolInventory) -> Result<Self> {
        let mut dict = Self::default();
        dict.add_entry("SILENCES", vec!["sil".to_string()], inventory);
        dict.add_entry("PAUSES", vec!["pau".to_string()], inventory);
        dict.add_entry("BREAK", vec!["br".to_string()], inventory);
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let phonemes: Vec<String> = value
                .trim()
                .trim_matches('"')
                .split(',')
                .map(str::to_string)
                .collect();
            dict.add_entry(key, phonemes, inventory);
        }
        dict.register_inventory(inventory);
        Ok(dict)
    }

    fn add_entry(&mut self, grapheme: &str, phonemes: Vec<String>, inventory: &SymbolInventory) {
        for symbol in &phonemes {
            self.symbols
                .entry(symbol.clone())
                .or_insert_with(|| inventory.classify(symbol));
        }
        self.entries.insert(grapheme.to_string(), phonemes);
    }

    fn register_inventory(&mut self, inventory: &SymbolInventory) {
        let known: HashSet<String> = inventory.known_symbols();
        for symbol in known {
            let kind = inventory.classify(&symbol);
            self.symbols.entry(symbol).or_insert(kind);
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl G2p for TableG2p {
    fn query(&self, lyric: &str) -> Option<Vec<String>> {
        self.entries.get(lyric).cloned()
    }

    fn is_valid_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    fn is_vowel(&self, symbol: &str) -> bool {
        self.symbols.get(symbol) == Some(&SymbolKind::Vowel)
    }
}
