// Small descriptive-statistics helpers shared by the rolling indicators and
// the performance metrics.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` when fewer than two observations are supplied, since the sample
/// variance is undefined there.  A constant sample is exactly 0: the mean of
/// repeated non-dyadic values can round away from the value itself.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if values.iter().all(|v| *v == values[0]) {
        return values[0].is_finite().then_some(0.0);
    }
    let m = mean(values)?;
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    let std_dev = variance.sqrt();
    std_dev.is_finite().then_some(std_dev)
}
