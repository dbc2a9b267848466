//! Feature scaler for duration-model input/output normalization.
//!
//! Statistics files are JSON dumps with parallel `min_`/`scale_` arrays,
//! one entry per feature dimension. Forward transform is
//! `(x − min) × scale`; the inverse is `x / scale + min`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
struct ScalerFile {
    #[serde(rename = "min_")]
    min: Vec<f32>,
    #[serde(rename = "scale_")]
    scale: Vec<f32>,
}

/// Per-dimension (min, scale) table.
#[derive(Debug, Clone)]
pub struct Scaler {
    min: Vec<f32>,
    scale: Vec<f32>,
}

impl Scaler {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let file: ScalerFile = serde_json::from_str(text)?;
        if file.min.len() != file.scale.len() {
            return Err(Error::ScalerWidth {
                expected: file.min.len(),
                got: file.scale.len(),
            });
        }
        Ok(Self {
            min: file.min,
            scale: file.scale,
        })
    }

    pub fn from_parts(min: Vec<f32>, scale: Vec<f32>) -> Self {
        Self { min, scale }
    }

    pub fn width(&self) -> usize {
        self.min.len()
    }

    /// Normalize a row-major matrix in place. Every row must match the
    /// scaler width.
    pub fn transform(&self, matrix: &mut [Vec<f32>]) -> Result<()> {
        for row in matrix.iter_mut() {
            if row.len() != self.width() {
                return Err(Error::ScalerWidth {
                    expected: row.len(),
                    got: self.width(),
                });
            }
            for (value, (min, scale)) in
                row.iter_mut().zip(self.min.iter().zip(&self.scale))
            {
                *value = (*value - min) * scale;
            }
        }
        Ok(())
    }

    /// Denormalize a vector in place using the first dimension's
    /// statistics, as duration-model outputs are single-column.
    pub fn inverse_transform_first(&self, values: &mut [f32]) -> Result<()> {
        let (Some(min), Some(scale)) = (self.min.first(), self.scale.first()) else {
            return Err(Error::ScalerWidth {
                expected: 1,
                got: 0,
            });
        };
        for value in values.iter_mut() {
            *value = *value / scale + min;
        }
        Ok(())
    }
}
