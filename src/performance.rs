// =============================================================================
// Performance Metrics — whole-period summary of a single price series
// =============================================================================
//
//   total return       = (close_last / close_first - 1) * 100
//   annual volatility  = stdev(daily returns) * sqrt(252) * 100
//   Sharpe ratio       = mean(daily returns) / stdev(daily returns) * sqrt(252)
//   max drawdown       = min_t (close_t / max(close_0..=t) - 1) * 100
//
// Sharpe carries no risk-free adjustment and is pinned to 0 when the return
// stdev is zero or undefined.  Max drawdown is always <= 0.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::engine::IndicatorEngine;
use crate::indicators::stats::{mean, sample_std_dev};
use crate::indicators::TRADING_DAYS_PER_YEAR;
use crate::market_data::Series;

/// Scalar summary metrics.  Everything but `sharpe_ratio` is in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerformanceMetrics {
    pub total_return_pct: f64,
    pub annual_volatility_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
}

impl std::fmt::Display for PerformanceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Return:      {:>9.2}%", self.total_return_pct)?;
        writeln!(f, "Annual Volatility: {:>9.2}%", self.annual_volatility_pct)?;
        writeln!(f, "Sharpe Ratio:      {:>9.2}", self.sharpe_ratio)?;
        write!(f, "Max Drawdown:      {:>9.2}%", self.max_drawdown_pct)
    }
}

/// Compute the summary metrics over the full series.
///
/// The series is non-empty by construction, so every ratio here has a
/// non-zero denominator except the return stdev, which is guarded.
pub fn compute_performance_metrics(series: &Series) -> PerformanceMetrics {
    let first = series.first().close;
    let last = series.last().close;
    let total_return_pct = (last / first - 1.0) * 100.0;

    let returns: Vec<f64> = IndicatorEngine::compute_returns(series)
        .into_iter()
        .flatten()
        .collect();

    let annualise = TRADING_DAYS_PER_YEAR.sqrt();
    let std_dev = sample_std_dev(&returns);

    let annual_volatility_pct = std_dev.map_or(0.0, |sd| sd * annualise * 100.0);

    let sharpe_ratio = match (mean(&returns), std_dev) {
        (Some(m), Some(sd)) if sd != 0.0 => m / sd * annualise,
        _ => 0.0,
    };

    let max_drawdown_pct = max_drawdown(&series.closes()) * 100.0;

    debug!(
        returns = returns.len(),
        total_return_pct, annual_volatility_pct, sharpe_ratio, max_drawdown_pct,
        "performance metrics computed"
    );

    PerformanceMetrics {
        total_return_pct,
        annual_volatility_pct,
        sharpe_ratio,
        max_drawdown_pct,
    }
}

/// Deepest decline from the running peak, as a fraction (<= 0).
fn max_drawdown(closes: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &close in closes {
        peak = peak.max(close);
        worst = worst.min(close / peak - 1.0);
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::tests::series_from_closes;

    #[test]
    fn flat_series_metrics() {
        let m = compute_performance_metrics(&series_from_closes(&[100.0; 21]));
        assert_eq!(m.total_return_pct, 0.0);
        assert_eq!(m.annual_volatility_pct, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.max_drawdown_pct, 0.0);
    }

    #[test]
    fn sharpe_is_zero_for_identical_returns() {
        // Doubling every bar => every daily return is exactly 1.0.
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 2.0_f64.powi(i)).collect();
        let m = compute_performance_metrics(&series_from_closes(&closes));
        assert_eq!(m.sharpe_ratio, 0.0);
        assert!(m.sharpe_ratio.is_finite());
    }

    #[test]
    fn sharpe_is_zero_for_identical_non_dyadic_returns() {
        // Geometric closes whose returns come out bitwise identical but are
        // not exactly representable (e.g. 1.071 => 0.07099999999999995).
        let mut checked = 0;
        for step in 1..200 {
            let ratio = 1.0 + step as f64 / 1000.0;
            let closes: Vec<f64> = (0..30).map(|i| 100.0 * ratio.powi(i)).collect();
            let series = series_from_closes(&closes);
            let returns: Vec<f64> = IndicatorEngine::compute_returns(&series)
                .into_iter()
                .flatten()
                .collect();
            if returns.iter().any(|r| *r != returns[0]) {
                continue;
            }
            checked += 1;
            let m = compute_performance_metrics(&series);
            assert_eq!(m.sharpe_ratio, 0.0, "ratio {ratio}");
            assert_eq!(m.annual_volatility_pct, 0.0, "ratio {ratio}");
        }
        assert!(checked > 0);
    }

    #[test]
    fn total_return_and_drawdown_known_values() {
        // Peak 120, trough 90 => drawdown -25%.  End 110 vs start 100 => +10%.
        let closes = [100.0, 120.0, 105.0, 90.0, 110.0];
        let m = compute_performance_metrics(&series_from_closes(&closes));
        assert!((m.total_return_pct - 10.0).abs() < 1e-9);
        assert!((m.max_drawdown_pct + 25.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_zero_for_non_decreasing_closes() {
        let closes = [100.0, 100.0, 101.0, 105.0, 105.0, 130.0];
        let m = compute_performance_metrics(&series_from_closes(&closes));
        assert_eq!(m.max_drawdown_pct, 0.0);
    }

    #[test]
    fn drawdown_never_positive() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.21).sin() * 15.0)
            .collect();
        let m = compute_performance_metrics(&series_from_closes(&closes));
        assert!(m.max_drawdown_pct <= 0.0);
        assert!(m.max_drawdown_pct < -1.0);
    }

    #[test]
    fn volatility_and_sharpe_known_values() {
        // Returns: +10%, -10%.  mean = 0 => Sharpe 0; sd = sqrt(0.02).
        let closes = [100.0, 110.0, 99.0];
        let m = compute_performance_metrics(&series_from_closes(&closes));
        let expected_vol = 0.02_f64.sqrt() * 252.0_f64.sqrt() * 100.0;
        assert!((m.annual_volatility_pct - expected_vol).abs() < 1e-9);
        assert!(m.sharpe_ratio.abs() < 1e-9);
    }

    #[test]
    fn single_bar_has_zero_metrics() {
        let m = compute_performance_metrics(&series_from_closes(&[50.0]));
        assert_eq!(m, PerformanceMetrics::default());
    }

    #[test]
    fn metrics_serialise_to_json() {
        let m = PerformanceMetrics {
            total_return_pct: 10.0,
            annual_volatility_pct: 20.0,
            sharpe_ratio: 0.5,
            max_drawdown_pct: -5.0,
        };
        let json: serde_json::Value = serde_json::to_value(m).unwrap();
        assert_eq!(json["total_return_pct"], 10.0);
        assert_eq!(json["sharpe_ratio"], 0.5);
        assert_eq!(json["max_drawdown_pct"], -5.0);
    }

    #[test]
    fn display_is_human_readable() {
        let m = PerformanceMetrics {
            total_return_pct: 12.345,
            annual_volatility_pct: 20.0,
            sharpe_ratio: 0.8,
            max_drawdown_pct: -15.5,
        };
        let s = m.to_string();
        assert!(s.contains("Total Return:"));
        assert!(s.contains("12.35%") || s.contains("12.34%"));
        assert!(s.contains("-15.50%"));
    }
}
