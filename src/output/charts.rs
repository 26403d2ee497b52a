// =============================================================================
// Chart Rendering — one PNG per figure
// =============================================================================
//
//   PriceWithAverages   close, MA20, MA50
//   Volume              daily volume bars
//   Volatility          20-day annualised volatility
//   Rsi                 RSI(14) on a fixed 0..100 axis, dashed lines at 70 / 30
//   ReturnsDistribution histogram of daily returns, zero marked
//
// Rendering is deterministic: identical input produces identical pixels.
// =============================================================================

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use super::canvas::{colors, Canvas, ValueRange};
use crate::engine::EnrichedSeries;
use crate::indicators::rsi::{OVERBOUGHT, OVERSOLD};

/// Number of histogram buckets for the returns distribution.
const HISTOGRAM_BINS: usize = 40;

/// The figures produced for every run, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PriceWithAverages,
    Volume,
    Volatility,
    Rsi,
    ReturnsDistribution,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::PriceWithAverages,
        ChartKind::Volume,
        ChartKind::Volatility,
        ChartKind::Rsi,
        ChartKind::ReturnsDistribution,
    ];

    /// File-name suffix, appended to the lowercase symbol.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::PriceWithAverages => "stock_price",
            Self::Volume => "volume",
            Self::Volatility => "volatility",
            Self::Rsi => "rsi",
            Self::ReturnsDistribution => "returns_distribution",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Draw `kind` for `enriched` and return the canvas without saving it.
pub fn draw_chart(kind: ChartKind, enriched: &EnrichedSeries, width: u32, height: u32) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let cols = enriched.columns();

    match kind {
        ChartKind::PriceWithAverages => {
            let closes: Vec<Option<f64>> = enriched.series().closes().into_iter().map(Some).collect();
            if let Some(range) =
                ValueRange::covering(&[&closes[..], &cols.ma20[..], &cols.ma50[..]])
            {
                canvas.line_series(&closes, range, colors::BLUE);
                canvas.line_series(&cols.ma20, range, colors::ORANGE);
                canvas.line_series(&cols.ma50, range, colors::GREEN);
            }
            canvas.legend(&[colors::BLUE, colors::ORANGE, colors::GREEN]);
        }
        ChartKind::Volume => {
            let volumes = enriched.series().volumes();
            let max = volumes.iter().copied().fold(0.0_f64, f64::max);
            let range = ValueRange::new(0.0, if max > 0.0 { max * 1.05 } else { 1.0 });
            canvas.bar_series(&volumes, range, colors::STEEL);
            canvas.legend(&[colors::STEEL]);
        }
        ChartKind::Volatility => {
            if let Some(range) = ValueRange::covering(&[&cols.volatility_20d[..]]) {
                // Volatility is non-negative; keep zero on the axis.
                let range = ValueRange::new(range.min.max(0.0), range.max);
                canvas.line_series(&cols.volatility_20d, range, colors::RED);
            }
            canvas.legend(&[colors::RED]);
        }
        ChartKind::Rsi => {
            let range = ValueRange::new(0.0, 100.0);
            canvas.hline(OVERBOUGHT, range, colors::RED, true);
            canvas.hline(OVERSOLD, range, colors::GREEN, true);
            canvas.line_series(&cols.rsi14, range, colors::PURPLE);
            canvas.legend(&[colors::PURPLE]);
        }
        ChartKind::ReturnsDistribution => {
            let returns: Vec<f64> = cols.daily_return.iter().flatten().copied().collect();
            if let Some(hist) = Histogram::build(&returns, HISTOGRAM_BINS) {
                let counts: Vec<f64> = hist.counts.iter().map(|&c| c as f64).collect();
                let top = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
                canvas.bar_series(&counts, ValueRange::new(0.0, top * 1.05), colors::BLUE);
                if let Some(frac) = hist.fraction_of(0.0) {
                    canvas.vline_at_fraction(frac, colors::BLACK);
                }
            }
            canvas.legend(&[colors::BLUE]);
        }
    }

    canvas
}

/// Draw and save `kind` to `path`.
pub fn render_chart(
    kind: ChartKind,
    enriched: &EnrichedSeries,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    let canvas = draw_chart(kind, enriched, width, height);
    canvas.save(path)?;
    debug!(chart = %kind, path = %path.display(), "chart rendered");
    Ok(())
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bucket counts over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
struct Histogram {
    min: f64,
    max: f64,
    counts: Vec<usize>,
}

impl Histogram {
    /// `None` when `values` has no finite entries or `bins == 0`.
    fn build(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut counts = vec![0usize; bins];
        let span = max - min;
        for v in finite {
            let idx = if span > 0.0 {
                (((v - min) / span) * bins as f64) as usize
            } else {
                bins / 2
            };
            counts[idx.min(bins - 1)] += 1;
        }
        Some(Self { min, max, counts })
    }

    /// Horizontal position of `value` as a fraction of the bucket range.
    fn fraction_of(&self, value: f64) -> Option<f64> {
        let span = self.max - self.min;
        (span > 0.0 && value >= self.min && value <= self.max).then(|| (value - self.min) / span)
    }
}
