//! Price source trait and request/error types.
//!
//! A [`PriceSource`] answers a single [`HistoryRequest`] with the daily table
//! for that ticker, or `None` when the provider has nothing for it. Absence
//! is not an error: callers turn it into a user-facing "no data" message.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferrocast_core::{
//!     DateRange, HistoryRequest, PriceSource, SourceError, SyntheticSource, TickerSymbol,
//! };
//!
//! async fn row_count(source: &SyntheticSource, range: DateRange) -> Result<usize, SourceError> {
//!     let ticker = TickerSymbol::parse("AAPL").expect("valid ticker");
//!     let table = source.history(HistoryRequest::new(ticker, range)).await?;
//!     Ok(table.map_or(0, |table| table.len()))
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{DateRange, ProviderId, RawPriceTable, TickerSymbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Internal,
}

/// Structured error raised by a price source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Daily history request for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub ticker: TickerSymbol,
    pub range: DateRange,
}

impl HistoryRequest {
    pub fn new(ticker: TickerSymbol, range: DateRange) -> Self {
        Self { ticker, range }
    }
}

/// Future returned by [`PriceSource::history`].
pub type HistoryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<RawPriceTable>, SourceError>> + Send + 'a>>;

/// Provider contract for daily price history.
///
/// Implementations must be `Send + Sync`; the web shell shares one source
/// across requests.
pub trait PriceSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the daily table for `req.ticker` within `req.range`.
    ///
    /// Returns `Ok(None)` when the ticker is unknown or has no trading days
    /// in range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider cannot be reached or answers
    /// with something that cannot be parsed.
    fn history<'a>(&'a self, req: HistoryRequest) -> HistoryFuture<'a>;
}
