// =============================================================================
// Indicator Engine — enriches a fetched Series with derived columns
// =============================================================================
//
// Pipeline (one pass, in this order):
//   1. Daily returns of close
//   2. MA20 / MA50 of close
//   3. 20-day volume MA and day-over-day volume change
//   4. RSI(14)
//   5. 20-day annualised volatility of the daily returns
//   6. MA20/MA50 crossover signal
//
// Window lengths are fixed constants.  The engine performs no I/O.
// =============================================================================

use tracing::{debug, info};

use crate::indicators::returns::calculate_pct_change;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::signal::calculate_crossover_signal;
use crate::indicators::sma::calculate_sma;
use crate::indicators::volatility::calculate_rolling_volatility;
use crate::market_data::Series;
use crate::types::Signal;

pub const SHORT_MA_WINDOW: usize = 20;
pub const LONG_MA_WINDOW: usize = 50;
pub const VOLUME_MA_WINDOW: usize = 20;
pub const RSI_PERIODS: usize = 14;
pub const VOLATILITY_WINDOW: usize = 20;

/// Derived columns, each index-aligned with the series' bars.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumns {
    pub daily_return: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma50: Vec<Option<f64>>,
    pub volume_ma20: Vec<Option<f64>>,
    pub volume_change: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
    pub volatility_20d: Vec<Option<f64>>,
    pub signal: Vec<Signal>,
}

/// A series together with its derived columns.  Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    series: Series,
    columns: IndicatorColumns,
}

impl EnrichedSeries {
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn columns(&self) -> &IndicatorColumns {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }
}

/// Stateless namespace for the column computations.
pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute every derived column and bundle it with the series.
    pub fn enrich(series: Series) -> EnrichedSeries {
        let daily_return = Self::compute_returns(&series);
        let ma20 = Self::compute_moving_average(&series, SHORT_MA_WINDOW);
        let ma50 = Self::compute_moving_average(&series, LONG_MA_WINDOW);
        let volume_ma20 = Self::compute_volume_moving_average(&series, VOLUME_MA_WINDOW);
        let volume_change = Self::compute_volume_change(&series);
        let rsi14 = Self::compute_rsi(&series, RSI_PERIODS);
        let volatility_20d = Self::compute_volatility(&series, VOLATILITY_WINDOW);
        let signal = Self::compute_signal(&series);

        let columns = IndicatorColumns {
            daily_return,
            ma20,
            ma50,
            volume_ma20,
            volume_change,
            rsi14,
            volatility_20d,
            signal,
        };

        if let Some(last) = columns.signal.last() {
            info!(
                symbol = %series.symbol(),
                bars = series.len(),
                latest_signal = %last,
                "indicators computed"
            );
        }

        EnrichedSeries { series, columns }
    }

    /// Daily percent change of close; `None` at index 0.
    pub fn compute_returns(series: &Series) -> Vec<Option<f64>> {
        calculate_pct_change(&series.closes())
    }

    /// Trailing simple moving average of close over `window` bars.
    pub fn compute_moving_average(series: &Series, window: usize) -> Vec<Option<f64>> {
        calculate_sma(&series.closes(), window)
    }

    pub fn compute_volume_moving_average(series: &Series, window: usize) -> Vec<Option<f64>> {
        calculate_sma(&series.volumes(), window)
    }

    pub fn compute_volume_change(series: &Series) -> Vec<Option<f64>> {
        calculate_pct_change(&series.volumes())
    }

    pub fn compute_rsi(series: &Series, periods: usize) -> Vec<Option<f64>> {
        calculate_rsi(&series.closes(), periods)
    }

    /// Annualised rolling volatility of the daily returns.
    pub fn compute_volatility(series: &Series, window: usize) -> Vec<Option<f64>> {
        let returns = Self::compute_returns(series);
        calculate_rolling_volatility(&returns, window)
    }

    /// MA20 vs MA50 crossover classification for every bar.
    pub fn compute_signal(series: &Series) -> Vec<Signal> {
        let ma20 = Self::compute_moving_average(series, SHORT_MA_WINDOW);
        let ma50 = Self::compute_moving_average(series, LONG_MA_WINDOW);
        let signal = calculate_crossover_signal(&ma20, &ma50);
        debug!(bars = signal.len(), "crossover signal classified");
        signal
    }
}
