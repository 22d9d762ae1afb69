mod config;
mod core;
mod engine;
mod io;
mod registry;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::config::config::AppCfg;
use crate::engine::pipeline::Pipeline;
use crate::registry::specs::SpecRegistry;

#[derive(Parser)]
#[command(name = "gpuscout")]
#[command(about = "Normalize and score scraped GPU marketplace listings", long_about = None)]
#[command(version)]
struct Cli {
    /// Application configuration (weights, thresholds, registry path)
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Input listings: a JSON array of raw listing records
    #[arg(short, long)]
    input: String,

    /// Directory for per-stage output artifacts
    #[arg(short, long, default_value = "out")]
    out_dir: String,

    /// Pretty-print output artifacts
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let cfg = AppCfg::load(&cli.config)?;
    let registry = SpecRegistry::load(&cfg.registry.path)?;

    let listings = io::read_listings(&cli.input)?;
    info!(listings = listings.len(), "Loaded input batch");

    let pipeline = Pipeline::new(registry, &cfg)?;
    let run = pipeline.run(&listings);
    io::write_artifacts(&cli.out_dir, &run, cli.pretty)?;

    info!(out_dir = %cli.out_dir, "Artifacts written");
    Ok(())
}
