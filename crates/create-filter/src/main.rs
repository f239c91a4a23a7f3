mod config;

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use sf_create_filter::{create_filter, HeadcountSource, SirenExclusion};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    let source = HeadcountSource::new(&config.path);

    info!(
        path = %config.path,
        compressed = source.is_compressed(),
        sirene_ul = ?config.sirene_ul,
        "create_filter starting"
    );

    let exclusion = config
        .sirene_ul
        .as_deref()
        .map(SirenExclusion::from_path)
        .transpose()
        .context("failed to load SIRENE unité légale file")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    create_filter(
        &mut out,
        &source,
        &config.perimeter_params(),
        exclusion.as_ref(),
    )
    .with_context(|| format!("failed to filter {}", config.path))?;

    Ok(())
}
