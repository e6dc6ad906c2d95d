use anyhow::{ensure, Context, Result};
use ndarray::{Array1, Array2, Axis};

/// Average a frame-major matrix over time, yielding one value per column.
pub(crate) fn frame_mean(frames: &[Vec<f64>]) -> Result<Array1<f32>> {
    let matrix = array_from_vec2(frames)?;
    let mean = matrix
        .mean_axis(Axis(0))
        .context("cannot average a spectrogram with no frames")?;
    ensure!(
        mean.iter().all(|v| v.is_finite()),
        "frame mean contains non-finite values"
    );
    Ok(mean)
}

fn array_from_vec2(data: &[Vec<f64>]) -> Result<Array2<f32>> {
    ensure!(!data.is_empty(), "spectrogram has no frames");
    let rows = data.len();
    let cols = data[0].len();
    ensure!(cols > 0, "spectrogram frames are empty");
    let mut flat = Vec::with_capacity(rows * cols);
    for (idx, row) in data.iter().enumerate() {
        ensure!(
            row.len() == cols,
            "frame {} has {} bins, expected {}",
            idx,
            row.len(),
            cols
        );
        flat.extend(row.iter().map(|v| *v as f32));
    }
    Array2::from_shape_vec((rows, cols), flat).context("inconsistent spectrogram dimensions")
}
