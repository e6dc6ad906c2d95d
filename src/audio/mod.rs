pub mod decoder;
pub mod resample;

use anyhow::Result;
use std::path::Path;

use crate::types::AudioSample;

/// Decode `path` and bring it to `target_rate`, the way every corpus file is loaded.
pub fn load_resampled(path: &Path, target_rate: u32) -> Result<AudioSample> {
    let decoded = decoder::decode_audio(path)?;
    if decoded.sample_rate == target_rate {
        return Ok(decoded);
    }
    let samples = resample::sinc_resample(&decoded.samples, decoded.sample_rate, target_rate)?;
    Ok(AudioSample {
        samples,
        sample_rate: target_rate,
    })
}
