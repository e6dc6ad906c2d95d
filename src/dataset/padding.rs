use ndarray::Array1;

use crate::features::{FeatureBlocks, FeatureKind};
use crate::types::FeatureVector;

/// A block that was longer than the reconciliation length and got cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub kind: FeatureKind,
    pub raw_len: usize,
}

/// Append `block` to `row`, zero-padded (or clamped) to exactly `target` values.
///
/// Returns `true` when data had to be dropped.
pub fn pad_block_into(block: &Array1<f32>, target: usize, row: &mut FeatureVector) -> bool {
    let kept = block.len().min(target);
    row.extend(block.iter().take(kept).copied());
    let padding = target.saturating_sub(block.len());
    row.extend(std::iter::repeat(0.0).take(padding));
    block.len() > target
}

/// Concatenate the five blocks, each reconciled to `max_features_len`.
pub fn assemble_row(
    blocks: &FeatureBlocks,
    max_features_len: usize,
) -> (FeatureVector, Vec<Truncation>) {
    let mut row = Vec::with_capacity(FeatureKind::ALL.len() * max_features_len);
    let mut truncated = Vec::new();
    for (kind, block) in blocks.iter() {
        if pad_block_into(block, max_features_len, &mut row) {
            truncated.push(Truncation {
                kind,
                raw_len: block.len(),
            });
        }
    }
    (row, truncated)
}
