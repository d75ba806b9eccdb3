use time::Date;

use crate::{TickerSymbol, ValidationError};

/// A single (date, close) observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: Date,
    pub close: f64,
}

/// Closing price series with strictly increasing dates and positive prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: TickerSymbol,
    currency: Option<String>,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(
        ticker: TickerSymbol,
        currency: Option<String>,
        points: Vec<PricePoint>,
    ) -> Result<Self, ValidationError> {
        for point in &points {
            if !point.close.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "close" });
            }
            if point.close <= 0.0 {
                return Err(ValidationError::NonPositiveValue { field: "close" });
            }
        }

        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(ValidationError::InvertedDateRange {
                start: pair[0].date.to_string(),
                end: pair[1].date.to_string(),
            });
        }

        Ok(Self {
            ticker,
            currency,
            points,
        })
    }

    pub fn ticker(&self) -> &TickerSymbol {
        &self.ticker
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }
}
