//! One forecast run: fetch, normalize, fit, render.
//!
//! Every run starts from a [`PipelineConfig`] and shares nothing with other
//! runs except the price source. The model fit and chart rendering are
//! CPU-bound and run on tokio's blocking pool.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use time::{Date, OffsetDateTime};

use crate::data_source::{HistoryRequest, PriceSource};
use crate::export::write_csv;
use crate::forecast::{ForecastResult, IntervalWidth, ModelKind};
use crate::normalize::normalize;
use crate::render::{render_candlestick, render_static, CandlestickChart, ChartKind, StaticChart, Theme};
use crate::{
    DateRange, ForecastHorizon, PipelineError, PriceSeries, ProviderId, RawPriceTable, TickerSymbol,
    DEFAULT_LOOKBACK_YEARS,
};

/// Per-request options.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub ticker: TickerSymbol,
    pub horizon: ForecastHorizon,
    pub theme: Theme,
    pub chart: ChartKind,
    pub model: ModelKind,
    pub lookback_years: u8,
    pub interval_width: IntervalWidth,
}

impl PipelineConfig {
    pub fn new(ticker: TickerSymbol) -> Self {
        Self {
            ticker,
            horizon: ForecastHorizon::default(),
            theme: Theme::default(),
            chart: ChartKind::default(),
            model: ModelKind::default(),
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            interval_width: IntervalWidth::default(),
        }
    }

    pub fn with_horizon(mut self, horizon: ForecastHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    pub fn with_lookback_years(mut self, years: u8) -> Self {
        self.lookback_years = years;
        self
    }

    pub fn with_interval_width(mut self, width: IntervalWidth) -> Self {
        self.interval_width = width;
        self
    }
}

/// Final forecast day, formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    pub date: Date,
    pub yhat: f64,
    pub lower: f64,
    pub upper: f64,
    pub currency: Option<String>,
}

impl ForecastSummary {
    fn from_forecast(forecast: &ForecastResult, currency: Option<&str>) -> Option<Self> {
        forecast.last().map(|point| Self {
            date: point.date,
            yhat: point.yhat,
            lower: point.lower,
            upper: point.upper,
            currency: currency.map(str::to_owned),
        })
    }
}

impl Display for ForecastSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let currency = self.currency.as_deref();
        write!(
            f,
            "Forecast for {}: {} (Range: {} ~ {})",
            self.date,
            format_price(self.yhat, currency),
            format_price(self.lower, currency),
            format_price(self.upper, currency)
        )
    }
}

/// Two-decimal price with `$` for USD (or unknown) and the ISO code otherwise.
pub fn format_price(value: f64, currency: Option<&str>) -> String {
    match currency {
        None | Some("USD") => format!("${value:.2}"),
        Some(code) => format!("{code} {value:.2}"),
    }
}

/// Fetch, clean and fit; no rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub table: RawPriceTable,
    pub series: PriceSeries,
    pub forecast: ForecastResult,
    pub summary: ForecastSummary,
    pub model: ModelKind,
    pub fit_elapsed: Duration,
}

/// Everything the shell shows or offers for download after one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub run: ForecastRun,
    pub chart: StaticChart,
    pub candlestick: Option<CandlestickChart>,
    pub csv: Vec<u8>,
    pub warnings: Vec<String>,
}

impl PipelineOutput {
    pub fn summary(&self) -> &ForecastSummary {
        &self.run.summary
    }

    pub fn fit_seconds(&self) -> f64 {
        self.run.fit_elapsed.as_secs_f64()
    }
}

/// Runs forecasts against one price source.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn PriceSource>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    /// Full run anchored at the current UTC date.
    pub async fn run_today(&self, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
        self.run(config, OffsetDateTime::now_utc().date()).await
    }

    /// Fetch, normalize, fit, then render the static chart (always, it backs
    /// the PNG download) and the candlestick chart when requested.
    ///
    /// A candlestick that cannot be drawn becomes a warning, not an error.
    pub async fn run(&self, config: &PipelineConfig, today: Date) -> Result<PipelineOutput, PipelineError> {
        let result = self.run_inner(config, today).await;
        if let Err(error) = &result {
            tracing::warn!(ticker = %config.ticker, %error, "forecast run failed");
        }
        result
    }

    async fn run_inner(&self, config: &PipelineConfig, today: Date) -> Result<PipelineOutput, PipelineError> {
        let run = self.forecast(config, today).await?;
        let csv = write_csv(&run.table)?;

        let theme = config.theme;
        let chart_kind = config.chart;
        let series = run.series.clone();
        let forecast = run.forecast.clone();
        let table = run.table.clone();
        let (chart, candlestick) = tokio::task::spawn_blocking(move || {
            let chart = render_static(&series, &forecast, theme)?;
            let candlestick = match chart_kind {
                ChartKind::Static => None,
                ChartKind::Candlestick => Some(render_candlestick(&table, theme)),
            };
            Ok::<_, PipelineError>((chart, candlestick))
        })
        .await
        .map_err(|e| PipelineError::Worker(e.to_string()))??;

        let mut warnings = Vec::new();
        let candlestick = match candlestick {
            Some(Ok(chart)) => Some(chart),
            Some(Err(error)) => {
                tracing::warn!(ticker = %config.ticker, %error, "candlestick chart downgraded to static chart");
                warnings.push(format!("{error}. Showing the forecast chart instead."));
                None
            }
            None => None,
        };

        tracing::info!(
            ticker = %config.ticker,
            source = %self.source_id(),
            model = %run.model,
            rows = run.table.len(),
            horizon = config.horizon.days(),
            fit_ms = run.fit_elapsed.as_millis() as u64,
            "forecast run complete"
        );

        Ok(PipelineOutput {
            run,
            chart,
            candlestick,
            csv,
            warnings,
        })
    }

    /// Fetch, normalize and fit without drawing anything.
    pub async fn forecast(&self, config: &PipelineConfig, today: Date) -> Result<ForecastRun, PipelineError> {
        let range = DateRange::lookback(today, config.lookback_years)?;
        let request = HistoryRequest::new(config.ticker.clone(), range);

        let table = self
            .source
            .history(request)
            .await?
            .filter(|table| !table.is_empty())
            .ok_or_else(|| PipelineError::NoData {
                ticker: config.ticker.to_string(),
            })?;
        tracing::debug!(ticker = %config.ticker, rows = table.len(), %range, "fetched history");

        let series = normalize(&table)?;

        let model = config.model;
        let interval = config.interval_width;
        let horizon = config.horizon;
        let fit_series = series.clone();
        let (forecast, fit_elapsed) = tokio::task::spawn_blocking(move || {
            let forecaster = model.forecaster(interval);
            let started = Instant::now();
            let forecast = forecaster.fit(&fit_series, horizon);
            let elapsed = started.elapsed();
            tracing::debug!(
                model = forecaster.name(),
                observations = fit_series.len(),
                fit_ms = elapsed.as_millis() as u64,
                "model fit finished"
            );
            (forecast, elapsed)
        })
        .await
        .map_err(|e| PipelineError::Worker(e.to_string()))?;
        let forecast = forecast?;

        let summary = ForecastSummary::from_forecast(&forecast, series.currency()).ok_or_else(|| {
            PipelineError::EmptySeries {
                ticker: config.ticker.to_string(),
            }
        })?;

        Ok(ForecastRun {
            table,
            series,
            forecast,
            summary,
            model,
            fit_elapsed,
        })
    }
}
