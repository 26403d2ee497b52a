// =============================================================================
// Percent Change (one-period return)
// =============================================================================
//
//   change_t = value_t / value_{t-1} - 1
//
// Applied to closes this is the daily return; applied to volume it is the
// day-over-day volume change.

/// Compute the one-period percent change of `values` (as a fraction, not a
/// percentage).
///
/// The output has the same length as the input.
///
/// # Edge cases
/// - Index 0 is always `None` (no prior value), never zero.
/// - A zero previous value yields `None` rather than an infinite change.
pub fn calculate_pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    if values.is_empty() {
        return result;
    }

    result.push(None);
    for w in values.windows(2) {
        let (prev, curr) = (w[0], w[1]);
        if prev == 0.0 {
            result.push(None);
            continue;
        }
        let change = curr / prev - 1.0;
        result.push(change.is_finite().then_some(change));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_change_empty() {
        assert!(calculate_pct_change(&[]).is_empty());
    }

    #[test]
    fn pct_change_first_is_undefined() {
        let r = calculate_pct_change(&[100.0]);
        assert_eq!(r.len(), 1);
        assert!(r[0].is_none());
    }

    #[test]
    fn pct_change_known_values() {
        let r = calculate_pct_change(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 3);
        assert!(r[0].is_none());
        assert!((r[1].unwrap() - 0.10).abs() < 1e-12);
        assert!((r[2].unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn pct_change_zero_previous_is_undefined() {
        let r = calculate_pct_change(&[0.0, 500.0, 1000.0]);
        assert!(r[1].is_none());
        assert!((r[2].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pct_change_flat_is_zero() {
        let r = calculate_pct_change(&[100.0; 5]);
        assert!(r[1..].iter().all(|v| *v == Some(0.0)));
    }
}
