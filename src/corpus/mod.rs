//! Recursive enumeration of a labeled recording corpus.
//!
//! Files are yielded in the order the filesystem lists them. No sorting is
//! applied, so the order (and therefore row order in the dataset) is only
//! stable for an unchanged directory on the same filesystem.

pub mod label;

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ExtractError;

pub use label::{parse_label, LABEL_POSITION};

/// A regular file found under the corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub path: PathBuf,
    /// Bare file name, the token the label is read from
    pub file_name: String,
}

/// Lazy, single-pass walk over every regular file below a root directory.
pub struct CorpusWalker {
    inner: walkdir::IntoIter,
}

impl CorpusWalker {
    /// Validate `root` and start the walk.
    pub fn new(root: &Path) -> Result<Self, ExtractError> {
        if !root.exists() {
            return Err(ExtractError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ExtractError::NotADirectory(root.to_path_buf()));
        }
        fs::read_dir(root)
            .map_err(|err| ExtractError::RootUnreadable(root.to_path_buf(), err.to_string()))?;

        Ok(Self {
            inner: WalkDir::new(root).follow_links(false).into_iter(),
        })
    }
}

impl Iterator for CorpusWalker {
    type Item = CorpusEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "corpus entry unreadable, skipped");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            return Some(CorpusEntry {
                path: entry.into_path(),
                file_name,
            });
        }
    }
}
