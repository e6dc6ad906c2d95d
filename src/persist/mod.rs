//! Durable storage for extracted datasets.
//!
//! Arrays are written with ndarray's serde representation so they can be
//! reloaded without re-running the signal processing.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::dataset::Manifest;
use crate::types::Dataset;

pub const FEATURES_FILE: &str = "X.json";
pub const LABELS_FILE: &str = "y.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths of the artifacts written by [`save_dataset`].
#[derive(Debug, Clone)]
pub struct SavedArtifacts {
    pub features: PathBuf,
    pub labels: PathBuf,
    pub manifest: PathBuf,
}

/// Write `X`, `y` and the manifest into `output_dir`, creating it if needed.
pub fn save_dataset(
    dataset: &Dataset,
    manifest: &Manifest,
    output_dir: &Path,
) -> Result<SavedArtifacts> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let artifacts = SavedArtifacts {
        features: output_dir.join(FEATURES_FILE),
        labels: output_dir.join(LABELS_FILE),
        manifest: output_dir.join(MANIFEST_FILE),
    };
    // nothing is renamed into place until every file has been written
    let mut staging = Staging::default();
    staging.stage(&artifacts.features, &dataset.features)?;
    staging.stage(&artifacts.labels, &dataset.labels)?;
    staging.stage(&artifacts.manifest, manifest)?;
    staging.commit()?;

    tracing::info!(
        output_dir = %output_dir.display(),
        rows = dataset.len(),
        cols = dataset.row_len(),
        "dataset saved"
    );
    Ok(artifacts)
}

/// Reload `X` and `y` previously written by [`save_dataset`].
pub fn load_dataset(dir: &Path) -> Result<(Array2<f32>, Array1<i64>)> {
    let features: Array2<f32> = read_json(&dir.join(FEATURES_FILE))?;
    let labels: Array1<i64> = read_json(&dir.join(LABELS_FILE))?;
    ensure!(
        features.nrows() == labels.len(),
        "{} has {} rows but {} has {} labels",
        FEATURES_FILE,
        features.nrows(),
        LABELS_FILE,
        labels.len()
    );
    Ok((features, labels))
}

/// Temp files written next to their targets, removed on drop unless committed.
#[derive(Default)]
struct Staging {
    files: Vec<(PathBuf, PathBuf)>,
}

impl Staging {
    fn stage<T: Serialize + ?Sized>(&mut self, path: &Path, value: &T) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let file =
            File::create(&tmp).with_context(|| format!("Failed to create {}", tmp.display()))?;
        self.files.push((tmp.clone(), path.to_path_buf()));
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)
            .with_context(|| format!("Failed to serialise {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", tmp.display()))?;
        Ok(())
    }

    fn commit(mut self) -> Result<()> {
        for (tmp, path) in &self.files {
            fs::rename(tmp, path)
                .with_context(|| format!("Failed to move {} into place", path.display()))?;
        }
        self.files.clear();
        Ok(())
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        for (tmp, _) in &self.files {
            let _ = fs::remove_file(tmp);
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}
