//! Core types for the speechset feature pipeline

use ndarray::{Array1, Array2};
use serde::Serialize;

/// Decoded audio (mono, f32 samples). Lives only for one file.
#[derive(Debug, Clone)]
pub struct AudioSample {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 22050)
    pub sample_rate: u32,
}

impl AudioSample {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Number of categories encoded by the filename digit (`1..=8`).
pub const N_CLASSES: u32 = 8;

/// Zero-based class index, always below [`N_CLASSES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LabelIndex(u32);

impl LabelIndex {
    /// Returns `None` when `index` is not a valid class.
    pub fn new(index: u32) -> Option<Self> {
        (index < N_CLASSES).then_some(Self(index))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// One padded, concatenated row of the feature matrix.
pub type FeatureVector = Vec<f32>;

/// Aligned feature matrix and label vector produced by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Shape `(rows, 5 * max_features_len)`
    pub features: Array2<f32>,
    /// Shape `(rows,)`
    pub labels: Array1<i64>,
    /// Per-block length every block was padded to
    pub max_features_len: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn row_len(&self) -> usize {
        self.features.ncols()
    }
}
