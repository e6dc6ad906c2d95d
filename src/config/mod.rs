use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::dataset::PadPolicy;

/// Environment fallback for the corpus root.
pub const CORPUS_ENV: &str = "SPEECHSET_CORPUS";
/// Environment fallback for the output directory.
pub const OUTPUT_ENV: &str = "SPEECHSET_OUTPUT";

/// Resolved locations for one extraction run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub corpus_root: PathBuf,
    pub output_dir: PathBuf,
    pub pad_policy: PadPolicy,
}

impl PipelineConfig {
    pub fn new(corpus_root: &Path, output_dir: &Path, pad_policy: PadPolicy) -> Result<Self> {
        let corpus_root = canonicalize_dir(corpus_root)?;
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(anyhow!(
                "output path {:?} exists and is not a directory",
                output_dir
            ));
        }
        Ok(Self {
            corpus_root,
            output_dir: output_dir.to_path_buf(),
            pad_policy,
        })
    }
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve corpus directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("corpus path {:?} is not a directory", canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::{PadPolicy, PipelineConfig};

    #[test]
    fn resolves_existing_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(
            dir.path(),
            &dir.path().join("out"),
            PadPolicy::FirstSuccess,
        )
        .unwrap();
        assert!(config.corpus_root.is_absolute());
        assert!(config.output_dir.ends_with("out"));
    }

    #[test]
    fn rejects_missing_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let result = PipelineConfig::new(
            &dir.path().join("missing"),
            dir.path(),
            PadPolicy::FirstSuccess,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_file_as_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("X.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(PipelineConfig::new(dir.path(), &file, PadPolicy::CorpusMax).is_err());
    }
}
