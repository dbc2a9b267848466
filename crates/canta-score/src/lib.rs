//! Score-side data model for the canta singing-voice-synthesis front end.
//!
//! This crate holds the types shared between the editor and the
//! phonemization core:
//! - [`Note`] — one musical note with lyric and optional phonetic hint.
//! - [`TimeAxis`] — the tick↔millisecond conversion collaborator.
//! - [`G2p`] — the grapheme-to-phoneme lookup collaborator.
//! - Pitch math (tone numbers, pitch names, frequencies).
//!
//! The phonemization core itself lives in `canta-phonemizer`.

mod note;
pub use note::Note;

mod timing;
pub use timing::{ConstTempo, TimeAxis, TICKS_PER_QUARTER};

mod g2p;
pub use g2p::{G2p, SymbolKind};

pub mod pitch;
