//! Command-line entry point.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use delight_rank::cluster::ClusterConfig;
use delight_rank::embedding::OpenAiEmbedder;
use delight_rank::extract::OpenAiExtractor;
use delight_rank::pipeline::ReviewPipeline;
use delight_rank::report;
use delight_rank::types::{PipelineConfig, Review};

#[derive(Debug, Parser)]
#[command(
    name = "delight-rank",
    version,
    about = "Extract delight attributes from customer reviews and cluster them into ranked categories"
)]
struct Cli {
    /// Path to the reviews JSON file
    input_file: PathBuf,

    /// Path to save the extracted records JSON
    json_output: PathBuf,

    /// Path to save the frequency table CSV
    csv_output: PathBuf,

    /// Reviews per extraction call
    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    /// Chat model for attribute extraction
    #[arg(long)]
    model: Option<String>,

    /// Embedding model for attribute clustering
    #[arg(long)]
    embedding_model: Option<String>,

    /// Clustering merge threshold
    #[arg(long)]
    distance_threshold: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY not found! Set it in the environment before running.")?;

    let raw = fs::read_to_string(&cli.input_file)
        .with_context(|| format!("error reading input file {}", cli.input_file.display()))?;
    let reviews: Vec<Review> = serde_json::from_str(&raw)
        .with_context(|| format!("error parsing input file {}", cli.input_file.display()))?;
    info!("loaded {} reviews from {}", reviews.len(), cli.input_file.display());

    let mut extractor = OpenAiExtractor::new(&api_key);
    if let Some(model) = &cli.model {
        extractor = extractor.with_model(model);
    }

    let mut embedder = OpenAiEmbedder::new(&api_key);
    if let Some(model) = &cli.embedding_model {
        embedder = embedder.with_model(model);
    }

    let mut cluster = ClusterConfig::default();
    if let Some(threshold) = cli.distance_threshold {
        cluster.distance_threshold = threshold;
    }
    let config = PipelineConfig::default()
        .with_batch_size(cli.batch_size)
        .with_cluster(cluster);

    let output = ReviewPipeline::new(extractor, embedder)
        .with_config(config)
        .run(&reviews);

    // Write whichever artifacts we can; a failed write is logged and the
    // other artifact still goes out.
    match report::write_records(&cli.json_output, &output.records) {
        Ok(()) => info!("JSON output saved to {}", cli.json_output.display()),
        Err(err) => error!("error saving JSON output: {err}"),
    }
    match report::write_frequency_table(&cli.csv_output, &output.delight_points) {
        Ok(()) => info!("CSV output saved to {}", cli.csv_output.display()),
        Err(err) => error!("error saving CSV output: {err}"),
    }

    Ok(())
}
