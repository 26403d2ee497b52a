// =============================================================================
// Pipeline Errors
// =============================================================================
//
// Every stage of the pipeline reports failure through `PipelineError`:
//
//   NoData / Acquisition  — the market-data fetch produced nothing usable.
//   Computation           — a contract violation on the input series.
//   Output                — a CSV write or chart render failed.
//
// None of these are retried.  `main` logs the error and exits non-zero.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source answered, but returned zero usable bars.
    #[error("no price data returned for {symbol}")]
    NoData { symbol: String },

    /// Transport, HTTP status, or payload-shape failure while fetching.
    #[error("failed to fetch price data for {symbol}: {source:#}")]
    Acquisition {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    /// The series violates an invariant the indicator engine relies on.
    #[error("computation failed: {0}")]
    Computation(String),

    /// Writing a file under the output directories failed.
    #[error("failed to write {}: {source:#}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub fn output(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::Output {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Short, stable label for the failure class (used in log fields).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoData { .. } | Self::Acquisition { .. } => "acquisition",
            Self::Computation(_) => "computation",
            Self::Output { .. } => "output",
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
