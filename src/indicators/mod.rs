// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free rolling-window computations over a single column.
// Every function returns one `Option<f64>` per input element so the output
// stays index-aligned with the bars; `None` marks the warm-up region where
// there is not yet enough history.

pub mod returns;
pub mod rsi;
pub mod signal;
pub mod sma;
pub mod stats;
pub mod volatility;

/// Trading days per year, used to annualise daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
