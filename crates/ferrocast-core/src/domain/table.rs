use std::fmt::{Display, Formatter};

use time::Date;

use crate::TickerSymbol;

/// Columns a provider may supply alongside the date index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Column {
    /// Canonical column order used by tables and CSV export.
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::AdjClose,
        Self::Volume,
    ];

    pub const OHLC: [Self; 4] = [Self::Open, Self::High, Self::Low, Self::Close];

    pub const fn header(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::AdjClose => "Adj Close",
            Self::Volume => "Volume",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(header))
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// One trading day as delivered by the provider. Any value may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: Date,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl PriceRow {
    pub const fn empty(date: Date) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            adj_close: None,
            volume: None,
        }
    }

    pub const fn ohlc(date: Date, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            adj_close: None,
            volume: None,
        }
    }

    pub fn with_adj_close(mut self, adj_close: f64) -> Self {
        self.adj_close = Some(adj_close);
        self
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Numeric value of `column`; volume is widened to `f64`.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Open => self.open,
            Column::High => self.high,
            Column::Low => self.low,
            Column::Close => self.close,
            Column::AdjClose => self.adj_close,
            Column::Volume => self.volume.map(|volume| volume as f64),
        }
    }
}

/// Daily OHLC(+Volume) table as fetched, kept for CSV export and candlesticks.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPriceTable {
    ticker: TickerSymbol,
    currency: Option<String>,
    columns: Vec<Column>,
    rows: Vec<PriceRow>,
}

impl RawPriceTable {
    pub fn new(ticker: TickerSymbol, columns: Vec<Column>, rows: Vec<PriceRow>) -> Self {
        let mut columns = columns;
        columns.sort();
        columns.dedup();

        Self {
            ticker,
            currency: None,
            columns,
            rows,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        let currency = currency.into().trim().to_ascii_uppercase();
        self.currency = (!currency.is_empty()).then_some(currency);
        self
    }

    pub fn ticker(&self) -> &TickerSymbol {
        &self.ticker
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Columns from `required` that this table does not carry.
    pub fn missing_columns(&self, required: &[Column]) -> Vec<Column> {
        required
            .iter()
            .copied()
            .filter(|column| !self.has_column(*column))
            .collect()
    }

    /// Earliest and latest row dates.
    pub fn date_range(&self) -> Option<(Date, Date)> {
        let first = self.rows.iter().map(|row| row.date).min()?;
        let last = self.rows.iter().map(|row| row.date).max()?;
        Some((first, last))
    }
}
