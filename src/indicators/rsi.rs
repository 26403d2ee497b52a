// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into a gain (delta > 0) and a loss (-delta < 0).
// Step 3 — avg_gain / avg_loss = simple mean of the trailing `period` gains /
//          losses (a plain rolling window, not Wilder's recursive smoothing).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A window with no losses has an undefined RS; RSI is pinned to 100 there.
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// Upper reference line drawn on the RSI chart.
pub const OVERBOUGHT: f64 = 70.0;
/// Lower reference line drawn on the RSI chart.
pub const OVERSOLD: f64 = 30.0;

/// Compute the RSI series for `closes`, index-aligned with the input.
///
/// Index `i` uses the deltas `closes[i-period+1] - closes[i-period]` through
/// `closes[i] - closes[i-1]`, so the first defined value is at `i == period`.
///
/// # Edge cases
/// - `period == 0` => every output is `None`
/// - `closes.len() <= period` => every output is `None`
/// - Average loss of zero (including a perfectly flat window) => 100.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return result;
    }

    // --- Split deltas into gains and losses ----------------------------------
    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                (delta, 0.0)
            } else {
                (0.0, -delta)
            }
        })
        .unzip();

    // --- Rolling means over `period` deltas ----------------------------------
    // deltas[k] belongs to bar k + 1, so a window ending at delta k lands on
    // bar k + 1.
    let period_f = period as f64;
    for end in (period - 1)..gains.len() {
        let start = end + 1 - period;
        let avg_gain = gains[start..=end].iter().sum::<f64>() / period_f;
        let avg_loss = losses[start..=end].iter().sum::<f64>() / period_f;
        result[end + 1] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

/// Label the most recent RSI value.
pub fn rsi_zone(value: f64) -> &'static str {
    if value >= OVERBOUGHT {
        "OVERBOUGHT"
    } else if value <= OVERSOLD {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If average loss is zero, RSI is 100.0 whatever the gain.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
