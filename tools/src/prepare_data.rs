//! prepare-data: raw customer table → clean dataset.
//!
//! Usage:
//!   prepare-data
//!
//! Paths and options come from config/pricing.json when present,
//! otherwise from the compiled-in defaults.

use anyhow::Result;
use premium_core::{
    config::{PipelineConfig, DEFAULT_CONFIG_PATH},
    prepare::prepare_data,
};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let config = PipelineConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?;
    log::debug!("raw data: {}", config.paths.raw_data.display());

    let summary = prepare_data(&config)?;

    if let Some(median) = summary.fills.credit_score_median {
        log::info!("credit_score median fill: {median}");
    }
    log::info!(
        "{} rows x {} columns, {} missing cells filled",
        summary.rows,
        summary.columns,
        summary.fills.total()
    );
    println!("Clean dataset saved to {}", summary.output_path.display());
    Ok(())
}
