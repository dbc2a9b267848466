//! Grapheme-to-phoneme collaborator trait and phoneme classification.

use serde::{Deserialize, Serialize};

/// Closed phoneme classification used by context labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Vowel,
    Consonant,
    Pause,
    Silence,
    Break,
}

impl SymbolKind {
    /// Single-letter code used in rendered context labels.
    pub fn code(&self) -> &'static str {
        match self {
            SymbolKind::Vowel => "v",
            SymbolKind::Consonant => "c",
            SymbolKind::Pause => "p",
            SymbolKind::Silence => "s",
            SymbolKind::Break => "b",
        }
    }
}

/// Grapheme-to-phoneme lookup.
///
/// Dictionaries themselves are external (loaded from a singer bank); the
/// phonemization core only consumes this trait.
pub trait G2p {
    /// Phoneme symbols for a lowercased lyric, or `None` when the lyric has
    /// no entry.
    fn query(&self, lyric: &str) -> Option<Vec<String>>;

    /// Whether `symbol` is a phoneme this singer understands.
    fn is_valid_symbol(&self, symbol: &str) -> bool;

    /// Whether `symbol` is a vowel.
    fn is_vowel(&self, symbol: &str) -> bool;
}

impl<T: G2p + ?Sized> G2p for &T {
    fn query(&self, lyric: &str) -> Option<Vec<String>> {
        (**self).query(lyric)
    }

    fn is_valid_symbol(&self, symbol: &str) -> bool {
        (**self).is_valid_symbol(symbol)
    }

    fn is_vowel(&self, symbol: &str) -> bool {
        (**self).is_vowel(symbol)
    }
}
