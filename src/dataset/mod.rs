//! Corpus-to-dataset aggregation.
//!
//! Files are processed one at a time in walk order. Per-file failures are
//! recorded in the [`Manifest`] and never abort the run; only directory-level
//! problems and an empty result are fatal.

pub mod padding;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::ValueEnum;
use ndarray::{Array1, Array2};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::corpus::{parse_label, CorpusEntry, CorpusWalker};
use crate::error::{ExtractError, SkipReason};
use crate::features::{BlockSource, FeatureBlocks, FeatureKind, SpectralBlockSource};
use crate::types::{Dataset, FeatureVector, LabelIndex};

use padding::assemble_row;

/// How the per-block reconciliation length is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PadPolicy {
    /// Longest block of the first successfully processed file, fixed from then on.
    #[default]
    FirstSuccess,
    /// Longest block over every successfully processed file (second pass).
    CorpusMax,
}

/// Outcome of one corpus file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Processed { label: LabelIndex, row: usize },
    Skipped { reason: SkipReason },
}

/// Every file the walk visited, in visit order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Manifest {
    pub outcomes: Vec<FileOutcome>,
}

impl Manifest {
    pub fn processed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Processed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.processed_count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Skipped { reason } => Some((o.path.as_path(), reason)),
            FileStatus::Processed { .. } => None,
        })
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub dataset: Dataset,
    pub manifest: Manifest,
    pub elapsed: Duration,
}

struct PendingRow {
    path: PathBuf,
    blocks: FeatureBlocks,
    label: LabelIndex,
}

/// Accumulates labelled rows and owns the reconciliation length.
pub struct Aggregator {
    policy: PadPolicy,
    max_features_len: Option<usize>,
    rows: Vec<FeatureVector>,
    labels: Vec<LabelIndex>,
    pending: Vec<PendingRow>,
}

impl Aggregator {
    pub fn new(policy: PadPolicy) -> Self {
        Self {
            policy,
            max_features_len: None,
            rows: Vec::new(),
            labels: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Reconciliation length, once known.
    pub fn max_features_len(&self) -> Option<usize> {
        self.max_features_len
    }

    pub fn len(&self) -> usize {
        self.labels.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add one file's blocks; returns the row index it will occupy.
    pub fn push(&mut self, path: &Path, blocks: FeatureBlocks, label: LabelIndex) -> usize {
        let row_index = self.len();
        match self.policy {
            PadPolicy::FirstSuccess => {
                let max_len = match self.max_features_len {
                    Some(len) => len,
                    // all-empty blocks leave the length unset for the next file
                    None if blocks.max_len() == 0 => 0,
                    None => {
                        let len = blocks.max_len();
                        debug!(
                            path = %path.display(),
                            max_features_len = len,
                            "padding length fixed"
                        );
                        self.max_features_len = Some(len);
                        len
                    }
                };
                let row = reconcile(path, &blocks, max_len);
                self.rows.push(row);
                self.labels.push(label);
            }
            PadPolicy::CorpusMax => {
                let len = blocks.max_len();
                self.max_features_len = Some(self.max_features_len.map_or(len, |m| m.max(len)));
                self.pending.push(PendingRow {
                    path: path.to_path_buf(),
                    blocks,
                    label,
                });
            }
        }
        row_index
    }

    /// Pack the accumulated rows into dense arrays.
    pub fn finish(mut self, skipped: usize) -> Result<Dataset, ExtractError> {
        if self.is_empty() {
            return Err(ExtractError::EmptyDataset { skipped });
        }
        let max_len = self.max_features_len.unwrap_or(0);

        for pending in std::mem::take(&mut self.pending) {
            self.rows.push(reconcile(&pending.path, &pending.blocks, max_len));
            self.labels.push(pending.label);
        }

        let row_len = FeatureKind::ALL.len() * max_len;
        // rows assembled before the length was known are all zeros
        for row in self.rows.iter_mut().filter(|row| row.is_empty()) {
            row.resize(row_len, 0.0);
        }
        let count = self.rows.len();
        let flat: Vec<f32> = self.rows.into_iter().flatten().collect();
        let features = Array2::from_shape_vec((count, row_len), flat)
            .map_err(|err| ExtractError::Shape(err.to_string()))?;
        let labels = Array1::from_iter(self.labels.iter().map(|l| l.get() as i64));

        Ok(Dataset {
            features,
            labels,
            max_features_len: max_len,
        })
    }
}

fn reconcile(path: &Path, blocks: &FeatureBlocks, max_len: usize) -> FeatureVector {
    let (row, truncated) = assemble_row(blocks, max_len);
    for cut in truncated {
        warn!(
            path = %path.display(),
            kind = %cut.kind,
            raw_len = cut.raw_len,
            max_features_len = max_len,
            "block longer than padding length, clamped"
        );
    }
    row
}

/// Walks a corpus and turns it into a [`Dataset`].
pub struct Extractor<S> {
    source: S,
    policy: PadPolicy,
}

impl<S: BlockSource> Extractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: PadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn run(&self, root: &Path) -> Result<Extraction, ExtractError> {
        let start = Instant::now();
        let walker = CorpusWalker::new(root)?;
        info!(root = %root.display(), "extracting features");

        let mut aggregator = Aggregator::new(self.policy);
        let mut manifest = Manifest::default();

        for entry in walker {
            info!(file = %entry.file_name, "processing");
            let status = match self.process(&entry) {
                Ok((blocks, label)) => {
                    let row = aggregator.push(&entry.path, blocks, label);
                    FileStatus::Processed { label, row }
                }
                Err(reason) => {
                    warn!(path = %entry.path.display(), %reason, "skipping file");
                    FileStatus::Skipped { reason }
                }
            };
            manifest.outcomes.push(FileOutcome {
                path: entry.path,
                status,
            });
        }

        let dataset = aggregator.finish(manifest.skipped_count())?;
        let elapsed = start.elapsed();
        info!(
            elapsed_secs = elapsed.as_secs_f64(),
            rows = dataset.len(),
            cols = dataset.row_len(),
            skipped = manifest.skipped_count(),
            "data loaded"
        );

        Ok(Extraction {
            dataset,
            manifest,
            elapsed,
        })
    }

    fn process(&self, entry: &CorpusEntry) -> Result<(FeatureBlocks, LabelIndex), SkipReason> {
        let label = parse_label(&entry.file_name)?;
        let blocks = self.source.blocks(&entry.path)?;
        Ok((blocks, label))
    }
}

/// Run the spectral pipeline over `root` with first-success padding.
pub fn extract(root: &Path) -> Result<Extraction, ExtractError> {
    Extractor::new(SpectralBlockSource::new()).run(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks_of(lengths: [usize; 5], fill: f32) -> FeatureBlocks {
        let [a, b, c, d, e] = lengths.map(|n| Array1::from_elem(n, fill));
        FeatureBlocks::new(a, b, c, d, e)
    }

    fn label(i: u32) -> LabelIndex {
        LabelIndex::new(i).unwrap()
    }

    #[test]
    fn first_success_fixes_length() {
        let mut agg = Aggregator::new(PadPolicy::FirstSuccess);
        assert_eq!(agg.max_features_len(), None);
        agg.push(Path::new("a"), blocks_of([40, 10, 7, 12, 6], 1.0), label(0));
        assert_eq!(agg.max_features_len(), Some(40));
        agg.push(Path::new("b"), blocks_of([40, 128, 7, 12, 6], 1.0), label(1));
        assert_eq!(agg.max_features_len(), Some(40));

        let dataset = agg.finish(0).unwrap();
        assert_eq!(dataset.features.dim(), (2, 200));
        assert_eq!(dataset.max_features_len, 40);
    }

    #[test]
    fn all_empty_first_file_leaves_length_open() {
        let mut agg = Aggregator::new(PadPolicy::FirstSuccess);
        agg.push(Path::new("silent"), blocks_of([0; 5], 0.0), label(2));
        assert_eq!(agg.max_features_len(), None);
        agg.push(Path::new("b"), blocks_of([40, 10, 7, 12, 6], 1.0), label(4));
        assert_eq!(agg.max_features_len(), Some(40));

        let dataset = agg.finish(0).unwrap();
        assert_eq!(dataset.features.dim(), (2, 200));
        assert_eq!(dataset.labels.to_vec(), vec![2, 4]);
        assert!(dataset.features.row(0).iter().all(|&v| v == 0.0));
        assert_eq!(dataset.features[[1, 0]], 1.0);
    }

    #[test]
    fn only_empty_files_give_zero_width_rows() {
        let mut agg = Aggregator::new(PadPolicy::FirstSuccess);
        agg.push(Path::new("a"), blocks_of([0; 5], 0.0), label(0));
        let dataset = agg.finish(0).unwrap();
        assert_eq!(dataset.features.dim(), (1, 0));
        assert_eq!(dataset.max_features_len, 0);
    }

    #[test]
    fn corpus_max_uses_longest_block_anywhere() {
        let mut agg = Aggregator::new(PadPolicy::CorpusMax);
        agg.push(Path::new("a"), blocks_of([40, 10, 7, 12, 6], 1.0), label(0));
        agg.push(Path::new("b"), blocks_of([40, 128, 7, 12, 6], 2.0), label(3));

        let dataset = agg.finish(0).unwrap();
        assert_eq!(dataset.max_features_len, 128);
        assert_eq!(dataset.features.dim(), (2, 640));
        assert_eq!(dataset.labels.to_vec(), vec![0, 3]);
        // mel block of the first row: 10 values then zeros
        assert_eq!(dataset.features[[0, 128 + 9]], 1.0);
        assert_eq!(dataset.features[[0, 128 + 10]], 0.0);
    }

    #[test]
    fn push_returns_row_indices_in_order() {
        let mut agg = Aggregator::new(PadPolicy::FirstSuccess);
        assert_eq!(agg.push(Path::new("a"), blocks_of([1; 5], 0.0), label(0)), 0);
        assert_eq!(agg.push(Path::new("b"), blocks_of([1; 5], 0.0), label(0)), 1);
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn empty_aggregator_is_fatal() {
        let agg = Aggregator::new(PadPolicy::FirstSuccess);
        assert!(matches!(
            agg.finish(3),
            Err(ExtractError::EmptyDataset { skipped: 3 })
        ));
    }

    #[test]
    fn manifest_counts_and_serialises() {
        let manifest = Manifest {
            outcomes: vec![
                FileOutcome {
                    path: PathBuf::from("03-01-02-01.wav"),
                    status: FileStatus::Processed {
                        label: label(1),
                        row: 0,
                    },
                },
                FileOutcome {
                    path: PathBuf::from("bad.wav"),
                    status: FileStatus::Skipped {
                        reason: SkipReason::Decode("Failed to probe audio format".into()),
                    },
                },
            ],
        };
        assert_eq!(manifest.processed_count(), 1);
        assert_eq!(manifest.skipped_count(), 1);
        assert_eq!(manifest.skipped().count(), 1);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "processed");
        assert_eq!(json["outcomes"][0]["label"], 1);
        assert_eq!(json["outcomes"][1]["status"], "skipped");
        assert_eq!(json["outcomes"][1]["reason"]["kind"], "decode");
    }
}
