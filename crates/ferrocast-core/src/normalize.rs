//! Projection of a provider table onto a clean closing-price series.

use std::collections::BTreeMap;

use crate::{PipelineError, PricePoint, PriceSeries, RawPriceTable};

/// Keep `(date, close)` from `table`, dropping rows whose close is missing,
/// non-finite or non-positive. Dates are sorted; for repeated dates the last
/// row in table order wins.
///
/// # Errors
///
/// Returns [`PipelineError::EmptySeries`] when no usable close remains.
pub fn normalize(table: &RawPriceTable) -> Result<PriceSeries, PipelineError> {
    let mut by_date = BTreeMap::new();
    let mut dropped = 0_usize;

    for row in table.rows() {
        match row.close {
            Some(close) if close.is_finite() && close > 0.0 => {
                by_date.insert(row.date, close);
            }
            _ => dropped += 1,
        }
    }

    if by_date.is_empty() {
        return Err(PipelineError::EmptySeries {
            ticker: table.ticker().to_string(),
        });
    }

    tracing::debug!(
        ticker = %table.ticker(),
        kept = by_date.len(),
        dropped,
        "normalized closing prices"
    );

    let points = by_date
        .into_iter()
        .map(|(date, close)| PricePoint { date, close })
        .collect();

    PriceSeries::new(
        table.ticker().clone(),
        table.currency().map(str::to_owned),
        points,
    )
    .map_err(PipelineError::from)
}
