use anyhow::{ensure, Result};
use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;

use super::params::{HOP_LENGTH, MEL_BANDS, MEL_MIN_FREQ};

/// Frame-major spectrogram (`[frame][bin]`) plus the bin centre frequencies.
pub(crate) struct Spectrogram {
    pub magnitude: Vec<Vec<f64>>,
    pub power: Vec<Vec<f64>>,
    pub freqs: Vec<f64>,
}

/// Short-time spectrum of `audio`, centred so that even clips shorter than
/// one window produce a frame.
pub(crate) fn compute_spectrogram(
    audio: &[f64],
    sample_rate: u32,
    fft_size: usize,
) -> Result<Spectrogram> {
    ensure!(!audio.is_empty(), "cannot analyse an empty waveform");
    let centred = centre_pad(audio, fft_size);

    let stft = spectrum::rstft(&centred, fft_size, HOP_LENGTH, WindowType::Hanning);
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    ensure!(
        !magnitude.is_empty(),
        "STFT with window {} produced no frames",
        fft_size
    );
    let power = analysis::make_power_spectrogram(&magnitude);
    let freqs = spectrum::rfftfreq(fft_size, sample_rate);

    Ok(Spectrogram {
        magnitude,
        power,
        freqs,
    })
}

/// Mel-band energies for every frame of `spectrogram`.
pub(crate) fn mel_frames(spectrogram: &Spectrogram, sample_rate: u32) -> Vec<Vec<f64>> {
    let filterbank = MelFilterbank::new(
        MEL_MIN_FREQ,
        (sample_rate as f64) / 2.0,
        MEL_BANDS,
        &spectrogram.freqs,
        true,
    );
    analysis::mel::make_mel_spectrogram(&spectrogram.power, &filterbank)
}

/// Zero-pad half a window on each side, and up to a full window overall.
fn centre_pad(audio: &[f64], fft_size: usize) -> Vec<f64> {
    let half = fft_size / 2;
    let body = audio.len().max(fft_size);
    let mut padded = vec![0.0; half + body + half];
    padded[half..half + audio.len()].copy_from_slice(audio);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_pad_surrounds_signal_with_silence() {
        let padded = centre_pad(&[1.0, 2.0], 4);
        assert_eq!(padded, vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn short_clip_still_yields_frames() {
        let audio: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
        let spec = compute_spectrogram(&audio, 22_050, 2048).unwrap();
        assert!(!spec.magnitude.is_empty());
        assert_eq!(spec.magnitude.len(), spec.power.len());
    }

    #[test]
    fn empty_waveform_is_rejected() {
        assert!(compute_spectrogram(&[], 22_050, 2048).is_err());
    }
}
