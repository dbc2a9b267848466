//! Phonemization and timing core for canta.
//!
//! Given groups of musical notes, this crate resolves each lyric to phoneme
//! symbols, builds HMM-style full-context labels, extracts numeric features
//! with an externally authored question set, runs an injected neural duration
//! model, and stretches the predicted durations so every syllable boundary
//! lands exactly on its note's tick position.
//!
//! The duration model is brought by the caller via the [`DurationModel`]
//! trait; this crate contains no ML framework dependencies.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canta_phonemizer::Phonemizer;
//! use canta_score::ConstTempo;
//!
//! let mut phonemizer = Phonemizer::load("path/to/singer", my_duration_model)?;
//! let axis = ConstTempo::new(120.0);
//!
//! phonemizer.set_up(&note_groups, &axis)?;
//! for group in &note_groups {
//!     let timings = phonemizer.process(group)?;
//!     for t in timings {
//!         println!("{} @ {} ticks", t.symbol, t.tick_offset);
//!     }
//! }
//! phonemizer.clean_up();
//! ```

mod error;
pub use error::{Error, Result};

mod config;
pub use config::{RedirectionRule, SingerConfig, SymbolInventory};

mod dict;
pub use dict::TableG2p;

mod question;
pub use question::{BinaryQuestion, NumericQuestion, QuestionSet};

mod context;
pub use context::{PhonemeCtx, PhraseContext, SyllableCtx};

mod syllable;
pub use syllable::{make_syllables, resolve_symbols, Syllable};

mod features;
pub use features::{apply_log_f0, linguistic_features};

mod scaler;
pub use scaler::Scaler;

mod model;
pub use model::{validate_output, DurationModel};

mod align;
pub use align::{align_positions, Anchor};

mod redirect;
pub use redirect::RedirectionDict;

mod phonemizer;
pub use phonemizer::{PhonemeTiming, Phonemizer};
