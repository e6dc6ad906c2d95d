use crate::error::LabelError;
use crate::types::{LabelIndex, N_CLASSES};

/// Zero-based character offset of the class digit (`03-01-05-...` → `5`).
pub const LABEL_POSITION: usize = 7;

/// Decode the class from a file name.
///
/// The digit at [`LABEL_POSITION`] encodes categories `1..=8`; the returned
/// index is `digit - 1`.
pub fn parse_label(file_name: &str) -> Result<LabelIndex, LabelError> {
    let found = file_name
        .chars()
        .nth(LABEL_POSITION)
        .ok_or(LabelError::TooShort {
            len: file_name.chars().count(),
            position: LABEL_POSITION,
        })?;
    let digit = found.to_digit(10).ok_or(LabelError::NotADigit {
        found,
        position: LABEL_POSITION,
    })?;
    digit
        .checked_sub(1)
        .and_then(LabelIndex::new)
        .ok_or(LabelError::OutOfRange {
            digit,
            classes: N_CLASSES,
        })
}
