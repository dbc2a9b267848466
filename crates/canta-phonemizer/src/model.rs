//! Duration-model abstraction.
//!
//! The phonemizer feeds normalized linguistic feature rows to a model
//! and expects one duration value per phoneme back. The inference
//! runtime is pluggable so callers bring their own backend.

use crate::error::{Error, Result};

/// Predicts per-phoneme durations from linguistic feature rows.
///
/// `features` holds one row per phoneme; the returned vector must hold
/// exactly one value per row.
pub trait DurationModel: Send {
    fn infer(&mut self, features: &[Vec<f32>]) -> Result<Vec<f32>>;
}

/// Checks a model output against the phoneme count it was asked for.
pub fn validate_output(output: Vec<f32>, expected: usize) -> Result<Vec<f32>> {
    if output.len() != expected {
        return Err(Error::ModelShape {
            expected,
            got: output.len(),
        });
    }
    Ok(output)
}
