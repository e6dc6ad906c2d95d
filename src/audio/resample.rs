use anyhow::{ensure, Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const SINC_LEN: usize = 256;

/// Band-limited resampling of mono `samples` from `source_rate` to `target_rate`.
///
/// Content above the lower of the two Nyquist frequencies is filtered out
/// before decimation. The output is aligned with the input (filter delay
/// removed) and holds `ceil(len * target / source)` samples.
pub fn sinc_resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let expected_len =
        (samples.len() as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize;

    // trailing silence flushes the filter tail out of the resampler
    let mut input: Vec<f32> = Vec::with_capacity(samples.len() + SINC_LEN);
    input.extend_from_slice(samples);
    input.resize(samples.len() + SINC_LEN, 0.0);

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, input.len(), 1)
        .with_context(|| {
            format!(
                "failed to create resampler for {} Hz to {} Hz",
                source_rate, target_rate
            )
        })?;
    let delay = resampler.output_delay();

    let waves = vec![input];
    let mut output = resampler
        .process(&waves, None)
        .context("resampling failed")?
        .into_iter()
        .next()
        .context("resampler returned no channels")?;

    tracing::debug!(
        source_rate,
        target_rate,
        frames_in = samples.len(),
        frames_out = expected_len,
        "resampled"
    );

    let start = delay.min(output.len());
    output.drain(..start);
    output.resize(expected_len, 0.0);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::sinc_resample;
    use std::f32::consts::PI;

    fn sine(freq: f32, rate: u32, seconds: f32) -> Vec<f32> {
        let len = (rate as f32 * seconds) as usize;
        (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    /// RMS of the middle half, away from onset transients.
    fn middle_rms(samples: &[f32]) -> f32 {
        let quarter = samples.len() / 4;
        let middle = &samples[quarter..samples.len() - quarter];
        (middle.iter().map(|s| s * s).sum::<f32>() / middle.len() as f32).sqrt()
    }

    #[test]
    fn preserves_constant_signal_after_resample() {
        let input = vec![0.5; 4410];
        let resampled = sinc_resample(&input, 44_100, 22_050).unwrap();
        assert_eq!(resampled.len(), 2205);
        assert!((middle_rms(&resampled) - 0.5).abs() < 1e-2);
    }

    #[test]
    fn tone_above_target_nyquist_is_removed() {
        let input = sine(20_000.0, 48_000, 0.5);
        let resampled = sinc_resample(&input, 48_000, 22_050).unwrap();
        assert_eq!(resampled.len(), 11_025);
        assert!(
            middle_rms(&resampled) < 0.01,
            "alias energy survived: {}",
            middle_rms(&resampled)
        );
    }

    #[test]
    fn passband_tone_keeps_its_level() {
        let input = sine(1_000.0, 48_000, 0.5);
        let resampled = sinc_resample(&input, 48_000, 22_050).unwrap();
        let expected = 0.5 / 2f32.sqrt();
        assert!((middle_rms(&resampled) - expected).abs() < 0.02);
    }

    #[test]
    fn upsampling_keeps_length_contract() {
        let resampled = sinc_resample(&sine(440.0, 16_000, 0.25), 16_000, 22_050).unwrap();
        assert_eq!(resampled.len(), 5_513);
    }

    #[test]
    fn rejects_zero_rates() {
        assert!(sinc_resample(&[0.1], 0, 22_050).is_err());
        assert!(sinc_resample(&[0.1], 22_050, 0).is_err());
    }
}
