// =============================================================================
// Shared types used across the analysis pipeline
// =============================================================================

use chrono::NaiveDate;

/// Moving-average crossover classification for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Short MA above long MA.
    Bullish,
    /// Not enough history for either moving average.
    Flat,
    /// Short MA at or below long MA, or only one MA defined.
    Bearish,
}

impl Signal {
    /// Numeric encoding used in the CSV export: 1, 0, -1.
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Bullish => 1,
            Self::Flat => 0,
            Self::Bearish => -1,
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::Flat
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Bullish => "Bullish",
            Self::Flat => "Flat",
            Self::Bearish => "Bearish",
        })
    }
}

/// Which slice of history to request from the market-data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    /// Explicit calendar range, `start` inclusive and `end` exclusive.
    Range { start: NaiveDate, end: NaiveDate },
    /// Everything in the last `years` years up to today.
    LookbackYears(u32),
}

impl std::fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Range { start, end } => write!(f, "{start}..{end}"),
            Self::LookbackYears(years) => write!(f, "last {years}y"),
        }
    }
}
