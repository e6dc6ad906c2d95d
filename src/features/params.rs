//! Fixed frequency-domain parameters of the pipeline.
//!
//! These are not configurable per run; changing any of them changes the
//! meaning of every column in a persisted dataset.

/// Every recording is resampled to this rate before analysis.
pub const SAMPLE_RATE: u32 = 22_050;
pub const HOP_LENGTH: usize = 512;

pub const MFCC_COUNT: usize = 40;
pub const MFCC_FFT_SIZE: usize = 2048;

pub const MEL_FFT_SIZE: usize = 4096;
pub const MEL_BANDS: usize = 128;
pub const MEL_MIN_FREQ: f64 = 20.0;

pub const CONTRAST_FFT_SIZE: usize = 2048;
pub const CONTRAST_BANDS: usize = 6;
pub const CONTRAST_MIN_FREQ: f64 = 200.0;
pub const CONTRAST_QUANTILE: f64 = 0.02;

pub const CHROMA_FFT_SIZE: usize = 2048;
pub const PITCH_CLASSES: usize = 12;
pub const TONNETZ_DIMS: usize = 6;
