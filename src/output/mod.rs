// =============================================================================
// Output — directory setup, CSV export, chart rendering
// =============================================================================
//
// `OutputLayout::prepare` is the only place that touches the filesystem
// layout; it runs once, before anything is written.  `write_all` then
// produces the CSV followed by every chart and stops at the first failure.
// =============================================================================

pub mod canvas;
pub mod charts;
pub mod csv_export;

use std::path::PathBuf;

use tracing::info;

use crate::engine::EnrichedSeries;
use crate::error::{PipelineError, PipelineResult};
use charts::ChartKind;

/// Where the export and figures go for one symbol.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    data_dir: PathBuf,
    figures_dir: PathBuf,
    stem: String,
    chart_width: u32,
    chart_height: u32,
}

/// Proof that the output directories exist.  Only obtainable from
/// [`OutputLayout::prepare`].
#[derive(Debug)]
pub struct PreparedOutput {
    layout: OutputLayout,
}

impl OutputLayout {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        figures_dir: impl Into<PathBuf>,
        symbol: &str,
        chart_width: u32,
        chart_height: u32,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            figures_dir: figures_dir.into(),
            stem: file_stem(symbol),
            chart_width,
            chart_height,
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}_stock_data.csv", self.stem))
    }

    pub fn chart_path(&self, kind: ChartKind) -> PathBuf {
        self.figures_dir
            .join(format!("{}_{}.png", self.stem, kind.file_suffix()))
    }

    /// Create the data and figures directories.
    pub fn prepare(self) -> PipelineResult<PreparedOutput> {
        for dir in [&self.data_dir, &self.figures_dir] {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::output(dir, e))?;
        }
        info!(
            data_dir = %self.data_dir.display(),
            figures_dir = %self.figures_dir.display(),
            "output directories ready"
        );
        Ok(PreparedOutput { layout: self })
    }
}

impl PreparedOutput {
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write the CSV, then every chart.  Returns the paths in write order.
    pub fn write_all(&self, enriched: &EnrichedSeries) -> PipelineResult<Vec<PathBuf>> {
        let layout = self.layout();
        let mut written = Vec::with_capacity(1 + ChartKind::ALL.len());

        let csv_path = layout.csv_path();
        csv_export::write_csv(&csv_path, enriched)
            .map_err(|e| PipelineError::output(&csv_path, e))?;
        info!(path = %csv_path.display(), rows = enriched.len(), "data exported");
        written.push(csv_path);

        for kind in ChartKind::ALL {
            let path = layout.chart_path(kind);
            charts::render_chart(kind, enriched, &path, layout.chart_width, layout.chart_height)
            .map_err(|e| PipelineError::output(&path, e))?;
            written.push(path);
        }

        info!(files = written.len(), "all outputs written");
        Ok(written)
    }
}

/// Lowercase, filesystem-safe form of a ticker (`BRK.B` -> `brk_b`).
fn file_stem(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Render a list of paths for the final summary.
pub fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}
