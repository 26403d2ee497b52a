// =============================================================================
// Yahoo Finance Chart Client — daily OHLCV history for one ticker
// =============================================================================
//
// Uses the public v8 chart endpoint (no API key):
//
//   GET /v8/finance/chart/{symbol}?interval=1d&range=2y
//   GET /v8/finance/chart/{symbol}?interval=1d&period1=<unix>&period2=<unix>
//
// The response holds parallel arrays (timestamp, open, high, low, close,
// volume).  Any row with a null field is dropped.  An empty result is a
// typed `NoData` error rather than an empty series.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, PipelineResult};
use crate::market_data::{PriceBar, Series};
use crate::types::FetchWindow;

/// Per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Yahoo rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; equity-lens/1.0)";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    // Absent entirely when the range holds no sessions.
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin HTTP client over the Yahoo Finance chart endpoint.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a client rooted at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        debug!(%base_url, "YahooClient initialised");
        Ok(Self { base_url, client })
    }

    /// Fetch daily bars for `symbol` over `window`.
    ///
    /// Errors:
    /// - `Acquisition` for transport failures, non-2xx responses, API error
    ///   objects, or malformed payloads.
    /// - `NoData` when the request succeeds but yields no complete rows.
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    pub async fn fetch_daily(&self, symbol: &str, window: FetchWindow) -> PipelineResult<Series> {
        let acquisition = |source| PipelineError::Acquisition {
            symbol: symbol.to_string(),
            source,
        };

        let url = self.chart_url(symbol, window).map_err(acquisition)?;
        let response = self.get_chart(url).await.map_err(acquisition)?;

        let series = parse_chart(symbol, response)?;
        info!(
            symbol,
            bars = series.len(),
            first = %series.first().date,
            last = %series.last().date,
            "daily history fetched"
        );
        Ok(series)
    }

    /// Build the request URL for `symbol` and `window`.  The symbol is a
    /// single escaped path segment.
    pub fn chart_url(&self, symbol: &str, window: FetchWindow) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base url {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("base url {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("interval", "1d");
            match window {
                FetchWindow::Range { start, end } => {
                    query.append_pair("period1", &midnight_utc(start).to_string());
                    query.append_pair("period2", &midnight_utc(end).to_string());
                }
                FetchWindow::LookbackYears(years) => {
                    query.append_pair("range", &format!("{years}y"));
                }
            }
        }

        Ok(url)
    }

    async fn get_chart(&self, url: Url) -> Result<ChartResponse> {
        debug!(url = %url, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        // Yahoo reports unknown symbols as 404 with a JSON error envelope;
        // surface that description when present.
        let parsed: Result<ChartResponse, _> = serde_json::from_str(&body);

        if !status.is_success() {
            if let Ok(ChartResponse {
                chart: ChartEnvelope {
                    error: Some(err), ..
                },
            }) = parsed
            {
                anyhow::bail!("chart endpoint returned {status}: {} - {}", err.code, err.description);
            }
            anyhow::bail!("chart endpoint returned {status}: {}", truncate(&body, 200));
        }

        parsed.context("failed to parse chart response")
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Turn a decoded chart response into a validated `Series`.
pub(crate) fn parse_chart(symbol: &str, response: ChartResponse) -> PipelineResult<Series> {
    let acquisition = |msg: String| PipelineError::Acquisition {
        symbol: symbol.to_string(),
        source: anyhow::anyhow!(msg),
    };

    if let Some(err) = response.chart.error {
        return Err(acquisition(format!("{} - {}", err.code, err.description)));
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(PipelineError::NoData {
            symbol: symbol.to_string(),
        });
    };

    let offset = data.meta.map_or(0, |m| m.gmtoffset);
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(data.timestamp.len());
    let mut skipped = 0usize;

    for (i, &ts) in data.timestamp.iter().enumerate() {
        let field = |col: &Vec<Option<f64>>| col.get(i).copied().flatten();
        let row = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            quote.volume.get(i).copied().flatten(),
        );

        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
            skipped += 1;
            continue;
        };

        let date = DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| acquisition(format!("timestamp {ts} out of range")))?;

        bars.push(PriceBar::new(date, open, high, low, close, volume));
    }

    if skipped > 0 {
        debug!(symbol, skipped, "dropped rows with missing fields");
    }

    Series::from_unordered(symbol, bars)
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
