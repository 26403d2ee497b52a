// =============================================================================
// Rolling Volatility — annualised sample standard deviation of returns
// =============================================================================
//
//   vol_t = stdev(r_{t-window+1} .. r_t) * sqrt(252)
//
// `stdev` is the sample (n - 1) standard deviation.  A window containing any
// undefined return (the first bar has none) is itself undefined, so with
// daily returns the first value appears at index `window`.
// =============================================================================

use super::stats::sample_std_dev;
use super::TRADING_DAYS_PER_YEAR;

/// Compute the annualised rolling volatility of a returns column.
///
/// # Edge cases
/// - `window < 2` => every output is `None` (sample stdev needs two points)
/// - Any `None` inside a window => `None` for that index
pub fn calculate_rolling_volatility(returns: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; returns.len()];
    if window < 2 || returns.len() < window {
        return result;
    }

    let annualise = TRADING_DAYS_PER_YEAR.sqrt();
    let mut buf: Vec<f64> = Vec::with_capacity(window);

    for (offset, slot) in returns.windows(window).enumerate() {
        buf.clear();
        buf.extend(slot.iter().flatten());
        if buf.len() < window {
            continue;
        }
        result[offset + window - 1] = sample_std_dev(&buf).map(|sd| sd * annualise);
    }

    result
}
