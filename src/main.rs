// =============================================================================
// Equity Lens — Main Entry Point
// =============================================================================
//
// One run analyses one ticker: fetch daily history, compute indicators and
// summary metrics, export CSV, render charts.  Exit status is 0 on success
// and 1 on any failure.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis_config;
mod engine;
mod error;
mod indicators;
mod market_data;
mod output;
mod performance;
mod pipeline;
mod types;
mod yahoo;

use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::analysis_config::{AnalysisConfig, DEFAULT_CONFIG_PATH};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Equity Lens — starting");

    // ── 2. Config ────────────────────────────────────────────────────────
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("Error: invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        symbol = %config.symbol,
        window = %config.fetch_window(),
        data_dir = %config.data_dir.display(),
        figures_dir = %config.figures_dir.display(),
        "configuration resolved"
    );

    // ── 3. Pipeline ──────────────────────────────────────────────────────
    match pipeline::run(&config).await {
        Ok(summary) => {
            println!("{summary}");
            info!("analysis complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "analysis failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Defaults <- JSON file (if present) <- environment, then validate.
fn load_config() -> Result<AnalysisConfig> {
    let path = std::env::var("ANALYSIS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

    let mut config = AnalysisConfig::load_or_default(&path)?;

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
