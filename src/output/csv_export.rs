//! Row-oriented CSV export of an enriched series.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::engine::EnrichedSeries;

pub const HEADER: [&str; 14] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Daily_Return",
    "MA20",
    "MA50",
    "Volume_MA20",
    "Volume_Change",
    "RSI",
    "Volatility_20d",
    "Signal",
];

/// Write one row per bar, date first.  Undefined indicator cells are empty.
pub fn write_csv(path: &Path, enriched: &EnrichedSeries) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    wtr.write_record(HEADER)?;

    let c = enriched.columns();
    for (i, bar) in enriched.series().bars().iter().enumerate() {
        wtr.write_record(&[
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            cell(c.daily_return[i]),
            cell(c.ma20[i]),
            cell(c.ma50[i]),
            cell(c.volume_ma20[i]),
            cell(c.volume_change[i]),
            cell(c.rsi14[i]),
            cell(c.volatility_20d[i]),
            c.signal[i].as_i8().to_string(),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    debug!(path = %path.display(), rows = enriched.len(), "csv written");
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}
