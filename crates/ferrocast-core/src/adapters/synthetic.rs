use time::{Date, Duration, Weekday};

use crate::data_source::{HistoryFuture, HistoryRequest, PriceSource};
use crate::{Column, PriceRow, ProviderId, RawPriceTable, TickerSymbol};

/// Tickers the synthetic source knows about.
pub const SYNTHETIC_CATALOG: [&str; 8] = ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "SPY", "QQQ"];

/// Deterministic offline price source.
///
/// Rows are generated for business days only, from a random walk seeded by
/// the ticker, so the same request always yields the same table.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    catalog: Vec<String>,
    columns: Vec<Column>,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            catalog: SYNTHETIC_CATALOG.iter().map(|ticker| (*ticker).to_owned()).collect(),
            columns: Column::ALL.to_vec(),
        }
    }
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the emitted columns, e.g. to simulate a close-only provider.
    pub fn with_columns(mut self, columns: impl Into<Vec<Column>>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn knows(&self, ticker: &TickerSymbol) -> bool {
        self.catalog.iter().any(|known| known == ticker.as_str())
    }

    fn generate(&self, req: &HistoryRequest) -> Option<RawPriceTable> {
        if !self.knows(&req.ticker) {
            return None;
        }

        let seed = symbol_seed(&req.ticker);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut close = 40.0 + (seed % 4_000) as f64 / 10.0;
        let drift = 0.0002 + (seed % 7) as f64 * 0.00005;

        let mut rows = Vec::new();
        let mut date = req.range.start();
        let mut day_index = 0_u32;
        while date < req.range.end() {
            if is_business_day(date) {
                let seasonal = 0.002 * (f64::from(date.ordinal()) / 365.25 * std::f64::consts::TAU).sin();
                let shock = (rng.f64() - 0.5) * 0.03;
                let open = close;
                close = (close * (1.0 + drift + seasonal + shock)).max(1.0);
                let spread = close * (0.004 + rng.f64() * 0.012);
                let high = open.max(close) + spread;
                let low = (open.min(close) - spread).max(0.5);
                let volume = 5_000_000 + rng.u64(0..20_000_000) + u64::from(day_index % 5) * 250_000;

                rows.push(self.project(PriceRow {
                    date,
                    open: Some(round_cents(open)),
                    high: Some(round_cents(high)),
                    low: Some(round_cents(low)),
                    close: Some(round_cents(close)),
                    adj_close: Some(round_cents(close * 0.985)),
                    volume: Some(volume),
                }));
                day_index += 1;
            }
            date = date.saturating_add(Duration::DAY);
        }

        if rows.is_empty() {
            return None;
        }

        Some(RawPriceTable::new(req.ticker.clone(), self.columns.clone(), rows).with_currency("USD"))
    }

    fn project(&self, row: PriceRow) -> PriceRow {
        let keep = |column: Column| self.columns.contains(&column);
        PriceRow {
            date: row.date,
            open: row.open.filter(|_| keep(Column::Open)),
            high: row.high.filter(|_| keep(Column::High)),
            low: row.low.filter(|_| keep(Column::Low)),
            close: row.close.filter(|_| keep(Column::Close)),
            adj_close: row.adj_close.filter(|_| keep(Column::AdjClose)),
            volume: row.volume.filter(|_| keep(Column::Volume)),
        }
    }
}

impl PriceSource for SyntheticSource {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> HistoryFuture<'a> {
        Box::pin(async move {
            let table = self.generate(&req);
            tracing::debug!(
                ticker = %req.ticker,
                rows = table.as_ref().map_or(0, RawPriceTable::len),
                "generated synthetic history"
            );
            Ok(table)
        })
    }
}

fn is_business_day(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn symbol_seed(symbol: &TickerSymbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
