//! Error types for the phonemization core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid singer config: {0}")]
    InvalidConfig(String),

    #[error("Malformed question set line {line}: {reason}")]
    QuestionSet { line: usize, reason: String },

    #[error("Malformed phoneme table line: {0}")]
    PhonemeTable(String),

    #[error("Scaler has {got} columns, feature matrix has {expected}")]
    ScalerWidth { expected: usize, got: usize },

    #[error("Duration model returned {got} durations for {expected} phonemes")]
    ModelShape { expected: usize, got: usize },

    #[error("Duration model error: {0}")]
    Model(String),

    #[error("No cached result for note group at tick {0}; set_up was not called for it")]
    MissingResult(i32),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Scaler parse error: {0}")]
    Json(#[from] serde_json::Error),
}
