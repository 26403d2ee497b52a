// =============================================================================
// Analysis Pipeline — fetch -> indicators -> metrics -> export -> charts
// =============================================================================
//
// Strictly sequential.  Ownership of the series is linear: the fetch produces
// it, the engine consumes it, the writers only borrow the enriched result.
// The first error aborts the run; outputs written before it stay on disk.
// =============================================================================

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::analysis_config::AnalysisConfig;
use crate::engine::IndicatorEngine;
use crate::error::{PipelineError, PipelineResult};
use crate::indicators::rsi::rsi_zone;
use crate::market_data::Series;
use crate::output::{display_paths, OutputLayout};
use crate::performance::{compute_performance_metrics, PerformanceMetrics};
use crate::types::Signal;
use crate::yahoo::YahooClient;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub symbol: String,
    pub bars: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub latest_close: f64,
    pub latest_rsi: Option<f64>,
    pub latest_signal: Signal,
    pub metrics: PerformanceMetrics,
    pub outputs: Vec<PathBuf>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Performance metrics for {} ({} trading days, {} to {})",
            self.symbol, self.bars, self.first_date, self.last_date
        )?;
        writeln!(f, "{}", self.metrics)?;
        writeln!(f)?;
        writeln!(f, "Latest close:      {:>10.2}", self.latest_close)?;
        match self.latest_rsi {
            Some(rsi) => writeln!(f, "Latest RSI(14):    {:>10.2} ({})", rsi, rsi_zone(rsi))?,
            None => writeln!(f, "Latest RSI(14):           n/a")?,
        }
        writeln!(f, "MA20/MA50 signal:  {:>10}", self.latest_signal)?;
        writeln!(f)?;
        write!(f, "Generated files:")?;
        for path in display_paths(&self.outputs) {
            write!(f, "\n  {path}")?;
        }
        Ok(())
    }
}

/// Run the whole pipeline for the configured symbol.
pub async fn run(config: &AnalysisConfig) -> PipelineResult<RunSummary> {
    let client = YahooClient::new(config.base_url.as_str()).map_err(|source| {
        PipelineError::Acquisition {
            symbol: config.symbol.clone(),
            source,
        }
    })?;

    let window = config.fetch_window();
    info!(symbol = %config.symbol, %window, "fetching daily history");
    let series = client.fetch_daily(&config.symbol, window).await?;

    let layout = OutputLayout::new(
        &config.data_dir,
        &config.figures_dir,
        &config.symbol,
        config.chart_width,
        config.chart_height,
    );
    process(series, layout)
}

/// Everything after acquisition: enrich, summarise, write.
pub fn process(series: Series, layout: OutputLayout) -> PipelineResult<RunSummary> {
    let metrics = compute_performance_metrics(&series);
    let enriched = IndicatorEngine::enrich(series);

    let metrics_json = serde_json::to_string(&metrics).map_err(|e| {
        PipelineError::Computation(format!("failed to serialise metrics: {e}"))
    })?;
    info!(
        symbol = %enriched.series().symbol(),
        metrics = %metrics_json,
        "metrics computed"
    );

    let prepared = layout.prepare()?;
    let outputs = prepared.write_all(&enriched)?;

    let series = enriched.series();
    let columns = enriched.columns();
    Ok(RunSummary {
        symbol: series.symbol().to_string(),
        bars: enriched.len(),
        first_date: series.first().date,
        last_date: series.last().date,
        latest_close: series.last().close,
        latest_rsi: columns.rsi14.last().copied().flatten(),
        latest_signal: columns.signal.last().copied().unwrap_or_default(),
        metrics,
        outputs,
    })
}
