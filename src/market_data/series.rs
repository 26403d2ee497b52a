use chrono::NaiveDate;

use crate::error::{PipelineError, PipelineResult};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// Series -- validated, date-ordered daily bars for one symbol
// ---------------------------------------------------------------------------

/// Ordered daily bars for a single ticker.
///
/// Construction goes through [`Series::new`], which enforces strictly
/// ascending dates and positive finite closes.  Once built the bars are only
/// reachable through shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl Series {
    /// Build a series from bars that are already sorted by date.
    ///
    /// An empty `bars` vector is a `NoData` error: every consumer downstream
    /// divides by counts derived from the bar count.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> PipelineResult<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(PipelineError::NoData { symbol });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(PipelineError::Computation(format!(
                    "{symbol}: close on {} must be positive and finite, got {}",
                    bar.date, bar.close
                )));
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(PipelineError::Computation(format!(
                    "{symbol}: bars must be strictly ascending by date ({} then {})",
                    bars[i - 1].date,
                    bar.date
                )));
            }
        }

        Ok(Self { symbol, bars })
    }

    /// Sort by date and drop repeated dates (last one wins) before
    /// validating.  Used by fetchers whose upstream occasionally repeats the
    /// current session.
    pub fn from_unordered(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> PipelineResult<Self> {
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self::new(symbol, deduped)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn first(&self) -> &PriceBar {
        // Non-empty by construction.
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes as `f64`, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a series of consecutive calendar days starting 2024-01-01 with
    /// the given closes.  OHL are set equal to the close.
    pub(crate) fn series_from_closes(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                PriceBar::new(
                    start + chrono::Days::new(i as u64),
                    c,
                    c,
                    c,
                    c,
                    1_000 + i as u64 * 10,
                )
            })
            .collect();
        Series::new("TEST", bars).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn empty_series_is_no_data() {
        let err = Series::new("AAPL", Vec::new()).unwrap_err();
        assert!(matches!(err, PipelineError::NoData { ref symbol } if symbol == "AAPL"));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let bars = vec![
            PriceBar::new(day(1), 1.0, 1.0, 1.0, 1.0, 10),
            PriceBar::new(day(1), 1.0, 1.0, 1.0, 1.0, 10),
        ];
        assert!(matches!(
            Series::new("X", bars),
            Err(PipelineError::Computation(_))
        ));
    }

    #[test]
    fn rejects_descending_dates() {
        let bars = vec![
            PriceBar::new(day(2), 1.0, 1.0, 1.0, 1.0, 10),
            PriceBar::new(day(1), 1.0, 1.0, 1.0, 1.0, 10),
        ];
        assert!(Series::new("X", bars).is_err());
    }

    #[test]
    fn rejects_non_positive_close() {
        let bars = vec![PriceBar::new(day(1), 1.0, 1.0, 1.0, 0.0, 10)];
        assert!(Series::new("X", bars).is_err());
        let bars = vec![PriceBar::new(day(1), 1.0, 1.0, 1.0, f64::NAN, 10)];
        assert!(Series::new("X", bars).is_err());
    }

    #[test]
    fn from_unordered_sorts_and_dedups() {
        let bars = vec![
            PriceBar::new(day(3), 3.0, 3.0, 3.0, 3.0, 30),
            PriceBar::new(day(1), 1.0, 1.0, 1.0, 1.0, 10),
            PriceBar::new(day(3), 3.5, 3.5, 3.5, 3.5, 35),
            PriceBar::new(day(2), 2.0, 2.0, 2.0, 2.0, 20),
        ];
        let series = Series::from_unordered("X", bars).unwrap();
        assert_eq!(series.len(), 3);
        let dates: Vec<NaiveDate> = series.bars().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(series.last().close, 3.5);
        assert_eq!(series.first().volume, 10);
    }

    #[test]
    fn column_accessors_follow_bar_order() {
        let series = series_from_closes(&[10.0, 11.0, 12.0]);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.volumes(), vec![1000.0, 1010.0, 1020.0]);
        assert_eq!(series.symbol(), "TEST");
    }
}
