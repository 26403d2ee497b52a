// =============================================================================
// Analysis Configuration — JSON file with environment overrides
// =============================================================================
//
// Resolution order (later wins):
//   1. Built-in defaults
//   2. `analysis_config.json` (or the path in ANALYSIS_CONFIG)
//   3. ANALYSIS_* environment variables (a `.env` file is honoured)
//
// All fields carry `#[serde(default)]` so a partial file still loads.
// Indicator window lengths are fixed and not configurable here.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::FetchWindow;

pub const DEFAULT_CONFIG_PATH: &str = "analysis_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbol() -> String {
    "AAPL".to_string()
}

fn default_lookback_years() -> u32 {
    2
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_figures_dir() -> PathBuf {
    PathBuf::from("figures")
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    600
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

// =============================================================================
// AnalysisConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Ticker symbol to analyse.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Relative window used when no explicit range is given.
    #[serde(default = "default_lookback_years")]
    pub lookback_years: u32,

    /// Explicit range start (inclusive).  Must be set together with
    /// `end_date`; takes precedence over `lookback_years`.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Explicit range end (exclusive).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Directory receiving the CSV export.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory receiving the chart images.
    #[serde(default = "default_figures_dir")]
    pub figures_dir: PathBuf,

    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    #[serde(default = "default_chart_height")]
    pub chart_height: u32,

    /// Market-data endpoint root.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            lookback_years: default_lookback_years(),
            start_date: None,
            end_date: None,
            data_dir: default_data_dir(),
            figures_dir: default_figures_dir(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            base_url: default_base_url(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// Only a missing file falls back to defaults (with a warning).  An
    /// unreadable file or invalid JSON is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read analysis config from {}", path.display())
                })
            }
        };

        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;
        config.symbol = normalise_symbol(&config.symbol);

        info!(path = %path.display(), symbol = %config.symbol, "analysis config loaded");
        Ok(config)
    }

    /// Apply `ANALYSIS_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(symbol) = get("ANALYSIS_SYMBOL") {
            self.symbol = normalise_symbol(&symbol);
        }
        if let Some(years) = get("ANALYSIS_LOOKBACK_YEARS") {
            self.lookback_years = years
                .parse()
                .with_context(|| format!("ANALYSIS_LOOKBACK_YEARS is not an integer: {years}"))?;
        }
        if let Some(start) = get("ANALYSIS_START") {
            self.start_date = Some(parse_date("ANALYSIS_START", &start)?);
        }
        if let Some(end) = get("ANALYSIS_END") {
            self.end_date = Some(parse_date("ANALYSIS_END", &end)?);
        }
        if let Some(dir) = get("ANALYSIS_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("ANALYSIS_FIGURES_DIR") {
            self.figures_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            anyhow::bail!("symbol must not be empty");
        }
        if self.chart_width < 200 || self.chart_height < 150 {
            anyhow::bail!(
                "chart size {}x{} is too small (minimum 200x150)",
                self.chart_width,
                self.chart_height
            );
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start >= end => {
                anyhow::bail!("start_date {start} must be before end_date {end}")
            }
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("start_date and end_date must be set together")
            }
            (None, None) if self.lookback_years == 0 => {
                anyhow::bail!("lookback_years must be at least 1")
            }
            _ => Ok(()),
        }
    }

    /// The history window to request.  Call after [`validate`].
    pub fn fetch_window(&self) -> FetchWindow {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => FetchWindow::Range { start, end },
            _ => FetchWindow::LookbackYears(self.lookback_years),
        }
    }
}

/// Trimmed, uppercase ticker.
fn normalise_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{key} must be YYYY-MM-DD, got {value}"))
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.symbol, "AAPL");
        assert_eq!(cfg.lookback_years, 2);
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.figures_dir, PathBuf::from("figures"));
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.fetch_window(), FetchWindow::LookbackYears(2));
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbol": "MSFT", "start_date": "2022-01-03", "end_date": "2023-01-03" }"#;
        let cfg: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbol, "MSFT");
        assert_eq!(cfg.chart_width, 1200);
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.fetch_window(),
            FetchWindow::Range {
                start: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
                end: NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            }
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "symbol": " nvda ", "lookback_years": 5 }"#).unwrap();
        let cfg = AnalysisConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.symbol, "NVDA");
        assert_eq!(cfg.fetch_window(), FetchWindow::LookbackYears(5));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AnalysisConfig::load_or_default(dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn load_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");

        std::fs::write(&path, r#"{ "symbol": "MSFT", "start_date": "bad" }"#).unwrap();
        assert!(AnalysisConfig::load_or_default(&path).is_err());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(AnalysisConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn load_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AnalysisConfig::load_or_default(dir.path()).is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let mut cfg = AnalysisConfig::default();
        cfg.apply_overrides(lookup(&[
            ("ANALYSIS_SYMBOL", " tsla "),
            ("ANALYSIS_START", "2021-06-01"),
            ("ANALYSIS_END", "2022-06-01"),
            ("ANALYSIS_FIGURES_DIR", "out/fig"),
        ]))
        .unwrap();
        assert_eq!(cfg.symbol, "TSLA");
        assert_eq!(cfg.figures_dir, PathBuf::from("out/fig"));
        assert!(matches!(cfg.fetch_window(), FetchWindow::Range { .. }));
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut cfg = AnalysisConfig::default();
        cfg.apply_overrides(lookup(&[("ANALYSIS_SYMBOL", "   ")])).unwrap();
        assert_eq!(cfg.symbol, "AAPL");
    }

    #[test]
    fn bad_override_is_error() {
        let mut cfg = AnalysisConfig::default();
        assert!(cfg
            .apply_overrides(lookup(&[("ANALYSIS_START", "06/01/2021")]))
            .is_err());
        assert!(cfg
            .apply_overrides(lookup(&[("ANALYSIS_LOOKBACK_YEARS", "two")]))
            .is_err());
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        let mut cfg = AnalysisConfig::default();
        cfg.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(cfg.validate().is_err(), "start without end");

        cfg.end_date = NaiveDate::from_ymd_opt(2023, 1, 1);
        assert!(cfg.validate().is_err(), "start after end");

        let mut cfg = AnalysisConfig::default();
        cfg.lookback_years = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.symbol = String::new();
        assert!(cfg.validate().is_err());
    }
}
