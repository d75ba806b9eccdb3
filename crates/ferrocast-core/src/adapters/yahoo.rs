use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::data_source::{HistoryFuture, HistoryRequest, PriceSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{Column, DateRange, PriceRow, ProviderId, RawPriceTable, TickerSymbol};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily history from the Yahoo Finance chart endpoint.
///
/// One request per call, no retries. Unknown tickers (HTTP 404 or a
/// `Not Found` chart error) and empty ranges come back as `Ok(None)`.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(&self, req: &HistoryRequest) -> String {
        let (period1, period2) = req.range.unix_bounds();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(req.ticker.as_str()),
            period1,
            period2
        )
    }

    async fn fetch_history(
        &self,
        req: &HistoryRequest,
    ) -> Result<Option<RawPriceTable>, SourceError> {
        let url = self.chart_url(req);
        tracing::debug!(ticker = %req.ticker, range = %req.range, "requesting yahoo chart");

        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.timed_out() {
                tracing::warn!(ticker = %req.ticker, timeout_ms = self.timeout_ms, "yahoo chart request timed out");
                SourceError::unavailable(format!("yahoo request timed out after {} ms", self.timeout_ms))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        if response.status == 404 {
            tracing::debug!(ticker = %req.ticker, "yahoo has no chart for ticker");
            return Ok(None);
        }

        if !response.is_success() {
            tracing::warn!(ticker = %req.ticker, status = response.status, "yahoo chart request failed");
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart(&req.ticker, &req.range, &response.body)
    }
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> HistoryFuture<'a> {
        Box::pin(async move { self.fetch_history(&req).await })
    }
}

/// Parse a v8 chart payload into a table, keeping only rows inside `range`.
pub fn parse_chart(
    ticker: &TickerSymbol,
    range: &DateRange,
    body: &str,
) -> Result<Option<RawPriceTable>, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("not found") {
            return Ok(None);
        }
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {} {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let Some(result) = response.chart.result.and_then(|results| results.into_iter().next())
    else {
        return Ok(None);
    };

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(None);
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_close = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|series| series.adjclose)
        .unwrap_or_default();
    let gmt_offset = result.meta.gmtoffset.unwrap_or(0);

    let mut columns = Vec::with_capacity(Column::ALL.len());
    for (column, present) in [
        (Column::Open, !quote.open.is_empty()),
        (Column::High, !quote.high.is_empty()),
        (Column::Low, !quote.low.is_empty()),
        (Column::Close, !quote.close.is_empty()),
        (Column::AdjClose, !adj_close.is_empty()),
        (Column::Volume, !quote.volume.is_empty()),
    ] {
        if present {
            columns.push(column);
        }
    }

    let mut rows = Vec::with_capacity(timestamps.len());
    for (index, ts_value) in timestamps.iter().enumerate() {
        let shifted = ts_value.checked_add(gmt_offset).ok_or_else(|| {
            SourceError::internal(format!("timestamp {ts_value} overflows with offset {gmt_offset}"))
        })?;
        let local = OffsetDateTime::from_unix_timestamp(shifted)
            .map_err(|e| SourceError::internal(format!("invalid timestamp {ts_value}: {e}")))?;
        let date = local.date();
        if !range.contains(date) {
            continue;
        }

        rows.push(PriceRow {
            date,
            open: value_at(&quote.open, index),
            high: value_at(&quote.high, index),
            low: value_at(&quote.low, index),
            close: value_at(&quote.close, index),
            adj_close: value_at(&adj_close, index),
            volume: value_at(&quote.volume, index)
                .filter(|volume| *volume >= 0.0)
                .map(|volume| volume.round() as u64),
        });
    }

    if rows.is_empty() {
        return Ok(None);
    }

    let table = RawPriceTable::new(ticker.clone(), columns, rows);
    Ok(Some(match result.meta.currency {
        Some(currency) => table.with_currency(currency),
        None => table,
    }))
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values
        .get(index)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

// Yahoo Finance chart response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
