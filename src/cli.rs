use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{CORPUS_ENV, OUTPUT_ENV};
use crate::dataset::PadPolicy;

/// Turn a labeled speech corpus into a persisted feature dataset.
#[derive(Parser, Debug)]
#[command(name = "speechset", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract features from every file under the corpus and save X/y.
    Extract(ExtractArgs),
    /// Print the shape of a previously saved dataset.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Root directory of the recordings
    #[arg(long, env = CORPUS_ENV, value_name = "DIR")]
    pub corpus: PathBuf,
    /// Directory that receives X.json, y.json and manifest.json
    #[arg(long, env = OUTPUT_ENV, value_name = "DIR")]
    pub output: PathBuf,
    /// How the per-block padding length is chosen
    #[arg(long, value_enum, default_value_t = PadPolicy::FirstSuccess)]
    pub pad_policy: PadPolicy,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Directory holding X.json and y.json
    #[arg(long, env = OUTPUT_ENV, value_name = "DIR")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::dataset::PadPolicy;
    use clap::Parser;

    #[test]
    fn extract_defaults_to_first_success() {
        let cli = Cli::try_parse_from([
            "speechset",
            "extract",
            "--corpus",
            "data/ravdess",
            "--output",
            "features",
        ])
        .unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.pad_policy, PadPolicy::FirstSuccess);
        assert!(args.corpus.ends_with("ravdess"));
    }

    #[test]
    fn parses_corpus_max_policy() {
        let cli = Cli::try_parse_from([
            "speechset",
            "extract",
            "--corpus",
            "c",
            "--output",
            "o",
            "--pad-policy",
            "corpus-max",
        ])
        .unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.pad_policy, PadPolicy::CorpusMax);
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Cli::try_parse_from([
            "speechset",
            "extract",
            "--corpus",
            "c",
            "--output",
            "o",
            "--pad-policy",
            "longest",
        ]);
        assert!(result.is_err());
    }
}
