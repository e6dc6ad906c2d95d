//! Error types for the dataset pipeline.
//!
//! Failures come in two tiers: [`ExtractError`] aborts the whole run, while
//! [`SkipReason`] is confined to a single file and ends up in the manifest.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Fatal pipeline errors. Nothing is persisted when one of these is returned.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Corpus root does not exist
    #[error("Corpus root not found: {0}")]
    RootNotFound(PathBuf),

    /// Corpus root exists but is not a directory
    #[error("Corpus root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Corpus root cannot be listed
    #[error("Corpus root unreadable {0}: {1}")]
    RootUnreadable(PathBuf, String),

    /// Every file was skipped, so there is no row shape to build arrays from
    #[error("No files were processed successfully ({skipped} skipped)")]
    EmptyDataset { skipped: usize },

    /// Accumulated rows could not be packed into a dense matrix
    #[error("Failed to assemble feature matrix: {0}")]
    Shape(String),
}

/// Why a single file was left out of the dataset.
#[derive(Debug, Clone, Error, Serialize, PartialEq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Corrupt or unsupported audio
    #[error("decode failed: {0}")]
    Decode(String),

    /// A spectral transform produced nothing usable
    #[error("feature computation failed: {0}")]
    Features(String),

    /// File name does not follow the labeling convention
    #[error("label parse failed: {0}")]
    Label(#[from] LabelError),
}

/// Failures of the fixed-offset filename label rule.
#[derive(Debug, Clone, Copy, Error, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabelError {
    #[error("file name has {len} characters, label digit expected at position {position}")]
    TooShort { len: usize, position: usize },

    #[error("character {found:?} at position {position} is not a digit")]
    NotADigit { found: char, position: usize },

    #[error("class digit {digit} outside 1..={classes}")]
    OutOfRange { digit: u32, classes: u32 },
}
