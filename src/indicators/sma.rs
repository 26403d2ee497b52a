// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (x_{t-period+1} + ... + x_t) / period
//
// Only full windows are averaged.  The first `period - 1` outputs are `None`.
// =============================================================================

/// Compute the trailing SMA of `values` over `period` elements.
///
/// The output is index-aligned with `values`.
///
/// # Edge cases
/// - `period == 0` => every output is `None`
/// - `values.len() < period` => every output is `None`
/// - A window whose mean is non-finite yields `None` for that index only.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let period_f = period as f64;
    for (offset, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period_f;
        if mean.is_finite() {
            result[offset + period - 1] = Some(mean);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 5).is_empty());
    }

    #[test]
    fn sma_period_zero() {
        assert!(calculate_sma(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn sma_insufficient_data() {
        let sma = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(sma.len(), 2);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn sma_period_equals_length() {
        let sma = calculate_sma(&[2.0, 4.0, 6.0], 3);
        assert!(sma[..2].iter().all(Option::is_none));
        assert!((sma[2].unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn sma20_matches_trailing_mean() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let sma = calculate_sma(&values, 20);
        for (i, v) in sma.iter().enumerate() {
            if i < 19 {
                assert!(v.is_none(), "index {i} should be undefined");
            } else {
                let expected = values[i - 19..=i].iter().sum::<f64>() / 20.0;
                assert!((v.unwrap() - expected).abs() < 1e-9, "index {i}");
            }
        }
    }

    #[test]
    fn sma_known_values() {
        let sma = calculate_sma(&ascending(6), 3);
        assert!(sma[..2].iter().all(Option::is_none));
        let defined: Vec<f64> = sma[2..].iter().map(|v| v.unwrap()).collect();
        assert_eq!(defined, vec![2.0, 3.0, 4.0, 5.0]);
    }
}
