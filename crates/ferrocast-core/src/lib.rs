//! # Ferrocast Core
//!
//! Price history, forecasting and chart rendering for the ferrocast stock
//! forecast tool.
//!
//! ## Overview
//!
//! One forecast run is a straight line through four stages:
//!
//! - **Fetch** a daily OHLC(+Volume) table for a ticker from a [`PriceSource`]
//! - **Normalize** it to a clean (date, close) [`PriceSeries`]
//! - **Fit** a [`Forecaster`] and project a [`ForecastHorizon`] of calendar days
//! - **Render** a static PNG chart and, on request, an SVG candlestick chart
//!
//! [`Pipeline`] wires the stages together for the web shell.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Price sources (Yahoo chart API, synthetic) |
//! | [`data_source`] | Price source trait and request/error types |
//! | [`domain`] | Domain models (ticker, date range, table, series, horizon) |
//! | [`error`] | Validation and pipeline errors |
//! | [`export`] | CSV export/import of the raw table |
//! | [`forecast`] | Forecaster trait, additive and drift models |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Table to close-series projection |
//! | [`pipeline`] | End-to-end forecast run |
//! | [`render`] | Static and candlestick charts |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ferrocast_core::{Pipeline, PipelineConfig, SyntheticSource, TickerSymbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(Arc::new(SyntheticSource::new()));
//!     let config = PipelineConfig::new(TickerSymbol::parse("aapl")?);
//!
//!     let output = pipeline.run_today(&config).await?;
//!     println!("{}", output.summary());
//!     std::fs::write("AAPL_stock_forecast.png", &output.chart.png)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Web form / API │
//! └────────┬────────┘
//!          │ PipelineConfig
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Price Source    │────▶│ HTTP Client      │
//! │ (Yahoo/Synth)   │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │ RawPriceTable
//!          ▼
//! ┌─────────────────┐
//! │ Normalizer      │
//! └────────┬────────┘
//!          │ PriceSeries
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Forecaster      │────▶│ Renderer         │
//! │ (blocking pool) │     │ (plotters)       │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Stages return `Result` and compose with `?` into [`PipelineError`], whose
//! `Display` is the message shown to the user:
//!
//! ```rust
//! use ferrocast_core::PipelineError;
//!
//! fn status_for(error: &PipelineError) -> u16 {
//!     if error.is_user_error() {
//!         422
//!     } else {
//!         502
//!     }
//! }
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod export;
pub mod forecast;
pub mod http_client;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod source;

// Re-export commonly used types at crate root for convenience

// Price sources
pub use adapters::{SyntheticSource, YahooAdapter, SYNTHETIC_CATALOG};
pub use data_source::{HistoryFuture, HistoryRequest, PriceSource, SourceError, SourceErrorKind};

// Domain models
pub use domain::{
    parse_date, Column, DateRange, ForecastHorizon, PricePoint, PriceRow, PriceSeries, RawPriceTable,
    TickerSymbol, DEFAULT_LOOKBACK_YEARS,
};

// Error types
pub use error::{PipelineError, ValidationError};

// CSV
pub use export::{csv_filename, png_filename, read_csv, write_csv, ExportError};

// Forecasting
pub use forecast::{
    AdditiveForecaster, DriftForecaster, ForecastPoint, ForecastResult, Forecaster, IntervalWidth,
    ModelFitError, ModelKind,
};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use normalize::normalize;

// Pipeline
pub use pipeline::{
    format_price, ForecastRun, ForecastSummary, Pipeline, PipelineConfig, PipelineOutput,
};

// Rendering
pub use render::{
    install_font, load_font_file, render_candlestick, render_static, render_static_sized,
    CandlestickChart, ChartKind, ChartLayout, RenderError, StaticChart, Theme,
};

// Source identifiers
pub use source::ProviderId;
