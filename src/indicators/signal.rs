// =============================================================================
// Moving-Average Crossover Classifier
// =============================================================================
//
// Each bar is classified independently from the two MA values at that bar;
// there is no carried state between bars.
//
//   both undefined           => Flat    (0)
//   exactly one defined      => Bearish (-1)
//   short >  long            => Bullish (1)
//   short <= long            => Bearish (-1)
// =============================================================================

use crate::types::Signal;

/// Classify every bar by comparing the short and long moving averages.
///
/// The two columns must be index-aligned; the output has the length of the
/// shorter one.
pub fn calculate_crossover_signal(short: &[Option<f64>], long: &[Option<f64>]) -> Vec<Signal> {
    short
        .iter()
        .zip(long.iter())
        .map(|(s, l)| classify(*s, *l))
        .collect()
}

fn classify(short: Option<f64>, long: Option<f64>) -> Signal {
    match (short, long) {
        (None, None) => Signal::Flat,
        (Some(s), Some(l)) if s > l => Signal::Bullish,
        // A lone MA cannot be "above" a missing one.
        _ => Signal::Bearish,
    }
}
