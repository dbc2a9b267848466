//! # Canta - Singing Voice Synthesis Front End
//!
//! Turns lyric-carrying note groups into timed phoneme sequences for a
//! neural singing synthesizer.
//!
//! ## Architecture
//!
//! Canta is an umbrella crate that coordinates:
//! - **canta-score** - Score-side model (notes, tick/ms time axis, G2P
//!   traits, pitch math)
//! - **canta-phonemizer** - Phonemization core (lyric resolution,
//!   full-context labels, question-set features, duration inference,
//!   tick alignment, redirection)
//!
//! The duration model itself is injected by the host application through
//! the [`DurationModel`] trait; canta ships no inference runtime.
//!
//! ## Quick Start
//!
//! ```ignore
//! use canta::{ConstTempo, Phonemizer};
//!
//! let mut phonemizer = Phonemizer::load(singer_dir, duration_model)?;
//! let axis = ConstTempo::new(120.0);
//!
//! phonemizer.set_up(&note_groups, &axis)?;
//! for group in &note_groups {
//!     for timing in phonemizer.process(group)? {
//!         println!("{} @ {:+} ticks", timing.symbol, timing.tick_offset);
//!     }
//! }
//! phonemizer.clean_up();
//! ```

/// Re-export of canta-score for direct access
pub use canta_score as score;

/// Re-export of canta-phonemizer for direct access
pub use canta_phonemizer as phonemizer;

// Score model
pub use canta_score::{pitch, ConstTempo, G2p, Note, SymbolKind, TimeAxis, TICKS_PER_QUARTER};

// Phonemization pipeline
pub use canta_phonemizer::{
    DurationModel, Error, PhonemeTiming, Phonemizer, QuestionSet, RedirectionRule, Result, Scaler,
    SingerConfig, SymbolInventory, TableG2p,
};
