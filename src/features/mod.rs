//! Spectral summaries computed for every corpus recording.

mod contrast;
pub mod params;
mod spectrogram;
mod statistics;
mod tonal;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use aus::analysis;
use ndarray::Array1;
use serde::Serialize;

use crate::audio;
use crate::error::SkipReason;
use crate::types::AudioSample;

use params::{
    CHROMA_FFT_SIZE, CONTRAST_FFT_SIZE, MEL_FFT_SIZE, MFCC_COUNT, MFCC_FFT_SIZE, SAMPLE_RATE,
};
use spectrogram::{compute_spectrogram, mel_frames};
use statistics::frame_mean;

/// The five block kinds, in the order they are concatenated into a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Mfcc,
    Mel,
    Contrast,
    Chroma,
    Tonnetz,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 5] = [
        FeatureKind::Mfcc,
        FeatureKind::Mel,
        FeatureKind::Contrast,
        FeatureKind::Chroma,
        FeatureKind::Tonnetz,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::Mfcc => "mfcc",
            FeatureKind::Mel => "mel",
            FeatureKind::Contrast => "contrast",
            FeatureKind::Chroma => "chroma",
            FeatureKind::Tonnetz => "tonnetz",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw, unreconciled per-file feature summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBlocks {
    blocks: [Array1<f32>; 5],
}

impl FeatureBlocks {
    pub fn new(
        mfcc: Array1<f32>,
        mel: Array1<f32>,
        contrast: Array1<f32>,
        chroma: Array1<f32>,
        tonnetz: Array1<f32>,
    ) -> Self {
        Self {
            blocks: [mfcc, mel, contrast, chroma, tonnetz],
        }
    }

    pub fn get(&self, kind: FeatureKind) -> &Array1<f32> {
        &self.blocks[kind as usize]
    }

    /// Blocks paired with their kind, in concatenation order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKind, &Array1<f32>)> {
        FeatureKind::ALL.into_iter().zip(self.blocks.iter())
    }

    pub fn lengths(&self) -> [usize; 5] {
        [0, 1, 2, 3, 4].map(|i| self.blocks[i].len())
    }

    /// Length of the longest block.
    pub fn max_len(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).max().unwrap_or(0)
    }
}

/// Produces the feature blocks for one corpus file.
///
/// Implementations must not panic on bad input; every failure is reported as
/// a [`SkipReason`] so the caller can leave the file out and carry on.
pub trait BlockSource {
    fn blocks(&self, path: &Path) -> std::result::Result<FeatureBlocks, SkipReason>;
}

/// Decodes a file and computes the five spectral summaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpectralBlockSource;

impl SpectralBlockSource {
    pub fn new() -> Self {
        Self
    }
}

impl BlockSource for SpectralBlockSource {
    fn blocks(&self, path: &Path) -> std::result::Result<FeatureBlocks, SkipReason> {
        let sample = audio::load_resampled(path, SAMPLE_RATE)
            .map_err(|err| SkipReason::Decode(format!("{:#}", err)))?;
        tracing::debug!(
            path = %path.display(),
            duration_secs = sample.duration_secs(),
            sample_rate = sample.sample_rate,
            "decoded"
        );
        compute_blocks(&sample).map_err(|err| SkipReason::Features(format!("{:#}", err)))
    }
}

/// Compute MFCC, mel, contrast, chroma and tonnetz means for `sample`.
pub fn compute_blocks(sample: &AudioSample) -> Result<FeatureBlocks> {
    let audio: Vec<f64> = sample.samples.iter().map(|&s| s as f64).collect();
    let rate = sample.sample_rate;

    let mfcc = {
        let spec = compute_spectrogram(&audio, rate, MFCC_FFT_SIZE)?;
        let mel = mel_frames(&spec, rate);
        let coefficients = analysis::mel::mfcc_spectrogram(&mel, MFCC_COUNT, None);
        frame_mean(&coefficients).context("mfcc")?
    };

    let mel = {
        let spec = compute_spectrogram(&audio, rate, MEL_FFT_SIZE)?;
        frame_mean(&mel_frames(&spec, rate)).context("mel spectrogram")?
    };

    let contrast = {
        let spec = compute_spectrogram(&audio, rate, CONTRAST_FFT_SIZE)?;
        frame_mean(&contrast::contrast_frames(&spec.magnitude, &spec.freqs))
            .context("spectral contrast")?
    };

    let (chroma, tonnetz) = {
        let spec = compute_spectrogram(&audio, rate, CHROMA_FFT_SIZE)?;
        let chroma_frames = tonal::chroma_frames(&spec.power, &spec.freqs);
        let tonnetz_frames = tonal::tonnetz_frames(&chroma_frames);
        (
            frame_mean(&chroma_frames).context("chroma")?,
            frame_mean(&tonnetz_frames).context("tonnetz")?,
        )
    };

    Ok(FeatureBlocks::new(mfcc, mel, contrast, chroma, tonnetz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use params::{CONTRAST_BANDS, PITCH_CLASSES, TONNETZ_DIMS};
    use std::f32::consts::PI;

    fn tone(freq: f32, seconds: f32) -> AudioSample {
        let len = (SAMPLE_RATE as f32 * seconds) as usize;
        AudioSample {
            samples: (0..len)
                .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
                .collect(),
            sample_rate: SAMPLE_RATE,
        }
    }

    #[test]
    fn block_order_is_stable() {
        let blocks = FeatureBlocks::new(
            Array1::zeros(1),
            Array1::zeros(2),
            Array1::zeros(3),
            Array1::zeros(4),
            Array1::zeros(5),
        );
        let kinds: Vec<_> = blocks.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, FeatureKind::ALL.to_vec());
        assert_eq!(blocks.lengths(), [1, 2, 3, 4, 5]);
        assert_eq!(blocks.max_len(), 5);
        assert_eq!(blocks.get(FeatureKind::Chroma).len(), 4);
    }

    #[test]
    fn tone_yields_fixed_block_sizes() {
        let blocks = compute_blocks(&tone(440.0, 0.5)).unwrap();
        assert_eq!(blocks.get(FeatureKind::Mfcc).len(), MFCC_COUNT);
        assert_eq!(blocks.get(FeatureKind::Contrast).len(), CONTRAST_BANDS + 1);
        assert_eq!(blocks.get(FeatureKind::Chroma).len(), PITCH_CLASSES);
        assert_eq!(blocks.get(FeatureKind::Tonnetz).len(), TONNETZ_DIMS);
        assert!(!blocks.get(FeatureKind::Mel).is_empty());
    }

    #[test]
    fn a440_tone_peaks_on_pitch_class_a() {
        let blocks = compute_blocks(&tone(440.0, 0.5)).unwrap();
        let chroma = blocks.get(FeatureKind::Chroma);
        let (peak, _) = chroma
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert_eq!(peak, 9);
    }

    #[test]
    fn identical_input_gives_identical_blocks() {
        let sample = tone(220.0, 0.3);
        assert_eq!(
            compute_blocks(&sample).unwrap(),
            compute_blocks(&sample).unwrap()
        );
    }
}
