mod config;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use sf_prepare_import::{prepare_import, save_to_file, BatchKey};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    let batch_key = BatchKey::new(&config.batch)?;

    info!(
        path = ?config.path,
        batch = %batch_key,
        date_fin_effectif = ?config.date_fin_effectif,
        "prepare-import starting"
    );

    let prepared = prepare_import(&config.path, &batch_key, config.date_fin_effectif)
        .with_context(|| format!("failed to prepare batch {}", batch_key))?;

    let output = config.output_path();
    save_to_file(&prepared.admin_object, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if let Some(unsupported) = prepared.unsupported {
        warn!(%unsupported, "Manifest written without unsupported files");
    }
    Ok(())
}
