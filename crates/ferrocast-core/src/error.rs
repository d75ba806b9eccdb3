use thiserror::Error;

use crate::data_source::SourceError;
use crate::export::ExportError;
use crate::forecast::ModelFitError;
use crate::render::RenderError;

/// Validation errors raised while building domain values from user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptySymbol,
    #[error("ticker length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("forecast horizon {value} is outside {min}..={max} days")]
    HorizonOutOfRange { value: u32, min: u32, max: u32 },

    #[error("date range start {start} must be before end {end}")]
    InvertedDateRange { start: String, end: String },
    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("lookback of {years} years is not supported")]
    InvalidLookback { years: u8 },

    #[error("interval width must be strictly between 0 and 1, got {value}")]
    InvalidIntervalWidth { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },

    #[error("invalid {option} '{value}', expected one of {expected}")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Failure of a single forecast run, surfaced to the user as one message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No data found for {ticker}.")]
    NoData { ticker: String },

    #[error("No usable closing prices for {ticker} after cleaning.")]
    EmptySeries { ticker: String },

    #[error("Forecast failed: {0}")]
    ModelFit(#[from] ModelFitError),

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Forecast worker stopped unexpectedly: {0}")]
    Worker(String),
}

impl PipelineError {
    /// True when the failure came from the request itself rather than from
    /// an upstream or internal step.
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NoData { .. } | Self::EmptySeries { .. } | Self::Validation(_) | Self::ModelFit(_)
        )
    }
}
