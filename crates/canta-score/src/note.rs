//! Musical note record.

use serde::{Deserialize, Serialize};

/// One musical note as the editor hands it to the phonemizer.
///
/// Notes are owned by the caller and read-only to the phonemization core.
/// Positions and durations are in ticks ([`crate::TICKS_PER_QUARTER`] per
/// quarter note); `tone` is a MIDI note number (middle C = 60).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Start position in ticks, absolute within the project.
    pub position: i32,
    /// Duration in ticks.
    pub duration: i32,
    /// MIDI tone number.
    pub tone: i32,
    /// Lyric text as typed by the user.
    pub lyric: String,
    /// Optional space-separated phoneme override.
    pub phonetic_hint: Option<String>,
}

impl Note {
    pub fn new(position: i32, duration: i32, tone: i32, lyric: impl Into<String>) -> Self {
        Self {
            position,
            duration,
            tone,
            lyric: lyric.into(),
            phonetic_hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.phonetic_hint = Some(hint.into());
        self
    }

    /// End position in ticks.
    #[inline]
    pub fn end(&self) -> i32 {
        self.position + self.duration
    }

    /// True for any `+`-prefixed extension note.
    #[inline]
    pub fn is_extension(&self) -> bool {
        self.lyric.starts_with('+')
    }

    /// True for notes that lengthen the previous syllable's vowel
    /// (`+~` and `+*` lyrics) instead of starting a new syllable.
    #[inline]
    pub fn is_vowel_extension(&self) -> bool {
        self.lyric.starts_with("+~") || self.lyric.starts_with("+*")
    }
}
