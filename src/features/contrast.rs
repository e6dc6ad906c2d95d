use super::params::{CONTRAST_BANDS, CONTRAST_MIN_FREQ, CONTRAST_QUANTILE};

const AMIN: f64 = 1e-10;

/// Peak-to-valley contrast in dB for `CONTRAST_BANDS + 1` octave bands.
///
/// Band 0 covers everything below `CONTRAST_MIN_FREQ`; each following band
/// spans one octave, and the last one runs to Nyquist.
pub(crate) fn contrast_frames(magnitude: &[Vec<f64>], freqs: &[f64]) -> Vec<Vec<f64>> {
    let bands = band_bins(freqs);
    magnitude
        .iter()
        .map(|frame| {
            bands
                .iter()
                .map(|bins| band_contrast(frame, bins))
                .collect()
        })
        .collect()
}

fn band_bins(freqs: &[f64]) -> Vec<Vec<usize>> {
    let mut edges = Vec::with_capacity(CONTRAST_BANDS + 2);
    edges.push(0.0);
    for k in 0..=CONTRAST_BANDS {
        edges.push(CONTRAST_MIN_FREQ * 2f64.powi(k as i32));
    }
    (0..=CONTRAST_BANDS)
        .map(|band| {
            let low = edges[band];
            let high = edges[band + 1];
            let last = band == CONTRAST_BANDS;
            freqs
                .iter()
                .enumerate()
                .filter(|(_, &f)| f >= low && (last || f < high))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect()
}

fn band_contrast(frame: &[f64], bins: &[usize]) -> f64 {
    let mut values: Vec<f64> = bins.iter().filter_map(|&i| frame.get(i).copied()).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let take = ((CONTRAST_QUANTILE * values.len() as f64).round() as usize).max(1);
    let valley = mean(&values[..take]);
    let peak = mean(&values[values.len() - take..]);
    to_db(peak) - to_db(valley)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn to_db(value: f64) -> f64 {
    10.0 * value.max(AMIN).log10()
}
