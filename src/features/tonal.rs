use std::f64::consts::PI;

use super::params::{PITCH_CLASSES, TONNETZ_DIMS};

const REFERENCE_A4: f64 = 440.0;
const MIN_PITCH_FREQ: f64 = 27.5;

/// Fold spectral power into the 12 pitch classes (C = 0), each frame scaled
/// so its strongest class is 1.
pub(crate) fn chroma_frames(power: &[Vec<f64>], freqs: &[f64]) -> Vec<Vec<f64>> {
    let classes: Vec<Option<usize>> = freqs.iter().map(|&f| pitch_class(f)).collect();
    power
        .iter()
        .map(|frame| {
            let mut chroma = vec![0.0; PITCH_CLASSES];
            for (value, class) in frame.iter().zip(classes.iter()) {
                if let Some(class) = class {
                    chroma[*class] += value;
                }
            }
            let peak = chroma.iter().cloned().fold(0.0_f64, f64::max);
            if peak > 0.0 {
                chroma.iter_mut().for_each(|v| *v /= peak);
            }
            chroma
        })
        .collect()
}

/// Project chroma frames onto the fifths, minor-third and major-third circles.
pub(crate) fn tonnetz_frames(chroma: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let basis = tonnetz_basis();
    chroma
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().map(|v| v.abs()).sum();
            basis
                .iter()
                .map(|row| {
                    if total <= 0.0 {
                        return 0.0;
                    }
                    row.iter()
                        .zip(frame.iter())
                        .map(|(weight, value)| weight * value / total)
                        .sum::<f64>()
                })
                .collect()
        })
        .collect()
}

fn pitch_class(freq: f64) -> Option<usize> {
    if !freq.is_finite() || freq < MIN_PITCH_FREQ {
        return None;
    }
    let midi = 69.0 + 12.0 * (freq / REFERENCE_A4).log2();
    Some((midi.round() as i64).rem_euclid(PITCH_CLASSES as i64) as usize)
}

fn tonnetz_basis() -> [[f64; PITCH_CLASSES]; TONNETZ_DIMS] {
    let circles = [(7.0 * PI / 6.0, 1.0), (3.0 * PI / 2.0, 1.0), (2.0 * PI / 3.0, 0.5)];
    let mut basis = [[0.0; PITCH_CLASSES]; TONNETZ_DIMS];
    for (idx, (step, radius)) in circles.iter().enumerate() {
        for class in 0..PITCH_CLASSES {
            let angle = class as f64 * step;
            basis[2 * idx][class] = radius * angle.sin();
            basis[2 * idx + 1][class] = radius * angle.cos();
        }
    }
    basis
}
