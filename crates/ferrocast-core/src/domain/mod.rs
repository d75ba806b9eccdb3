//! # Domain Models
//!
//! Value types shared by every pipeline stage.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TickerSymbol`] | Upper-cased ticker as entered by the user |
//! | [`DateRange`] | Half-open calendar window for history requests |
//! | [`RawPriceTable`] | Provider table (OHLC, Adj Close, Volume) indexed by date |
//! | [`PriceSeries`] | Cleaned (date, close) series |
//! | [`ForecastHorizon`] | Future days to forecast, bounded 30..=365 |
//!
//! Constructors validate their invariants, so a `PriceSeries` in hand always
//! has strictly increasing dates and positive closes.

mod horizon;
mod range;
mod series;
mod symbol;
mod table;

pub use horizon::ForecastHorizon;
pub use range::{parse_date, DateRange, DEFAULT_LOOKBACK_YEARS};
pub use series::{PricePoint, PriceSeries};
pub use symbol::TickerSymbol;
pub use table::{Column, PriceRow, RawPriceTable};
