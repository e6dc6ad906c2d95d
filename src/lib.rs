//! Speech corpus feature extraction.
//!
//! Walks a directory of labeled recordings, summarises each one with five
//! spectral feature blocks, and assembles a fixed-width `(X, y)` dataset.

pub mod audio;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod features;
pub mod persist;
pub mod types;

pub use dataset::{extract, Extraction, Extractor, Manifest, PadPolicy};
pub use error::{ExtractError, LabelError, SkipReason};
pub use types::{AudioSample, Dataset, LabelIndex};
