use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use speechset::cli::{Cli, Command, ExtractArgs, InspectArgs};
use speechset::config::PipelineConfig;
use speechset::features::SpectralBlockSource;
use speechset::{persist, Extractor};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => handle_extract(&args),
        Command::Inspect(args) => handle_inspect(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_extract(args: &ExtractArgs) -> Result<()> {
    let config = PipelineConfig::new(&args.corpus, &args.output, args.pad_policy)
        .context("Failed to validate command-line arguments")?;

    println!("speechset v{}", env!("CARGO_PKG_VERSION"));
    println!("Corpus: {:?}", config.corpus_root);
    println!("Output dir: {:?}", config.output_dir);

    let extraction = Extractor::new(SpectralBlockSource::new())
        .with_policy(config.pad_policy)
        .run(&config.corpus_root)
        .context("Feature extraction failed")?;

    let dataset = &extraction.dataset;
    println!(
        "--- Data loaded. Loading time: {:.2} seconds ---",
        extraction.elapsed.as_secs_f64()
    );
    println!(
        "X {:?}, y {:?} (max_features_len {}, {} skipped)",
        dataset.features.shape(),
        dataset.labels.shape(),
        dataset.max_features_len,
        extraction.manifest.skipped_count()
    );

    let saved = persist::save_dataset(dataset, &extraction.manifest, &config.output_dir)
        .context("Failed to persist dataset")?;
    println!("Wrote {:?} and {:?}", saved.features, saved.labels);
    Ok(())
}

fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let (features, labels) = persist::load_dataset(&args.output)
        .with_context(|| format!("Failed to load dataset from {:?}", args.output))?;
    println!("X {:?}, y {:?}", features.shape(), labels.shape());
    Ok(())
}
