use super::{
    future_dates, require_points, ForecastPoint, ForecastResult, Forecaster, IntervalWidth,
    ModelFitError,
};
use crate::{ForecastHorizon, PriceSeries};

/// Random walk with drift.
///
/// Drift is the average change per calendar day between the first and last
/// observation. Each in-sample point is predicted from the previous close.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftForecaster {
    interval: IntervalWidth,
}

impl DriftForecaster {
    pub fn new(interval: IntervalWidth) -> Self {
        Self { interval }
    }
}

impl Forecaster for DriftForecaster {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn fit(
        &self,
        series: &PriceSeries,
        horizon: ForecastHorizon,
    ) -> Result<ForecastResult, ModelFitError> {
        require_points(series, 2)?;
        let points = series.points();
        let (first, last) = (points[0], points[points.len() - 1]);
        let span = (last.date - first.date).whole_days().max(1) as f64;
        let drift = (last.close - first.close) / span;

        let mut fitted = Vec::with_capacity(points.len());
        fitted.push(first.close);
        let mut squared = 0.0;
        for pair in points.windows(2) {
            let gap = (pair[1].date - pair[0].date).whole_days().max(1) as f64;
            let yhat = pair[0].close + drift * gap;
            squared += (pair[1].close - yhat).powi(2) / gap;
            fitted.push(yhat);
        }
        let sigma = (squared / (points.len() - 1) as f64).sqrt();
        let z = self.interval.z()?;

        let mut output = Vec::with_capacity(points.len() + horizon.days() as usize);
        for (point, yhat) in points.iter().zip(fitted) {
            let half = z * sigma;
            output.push(ForecastPoint {
                date: point.date,
                yhat,
                lower: yhat - half,
                upper: yhat + half,
            });
        }
        for date in future_dates(last.date, horizon) {
            let days_ahead = (date - last.date).whole_days().max(1) as f64;
            let yhat = last.close + drift * days_ahead;
            let half = z * sigma * days_ahead.sqrt();
            output.push(ForecastPoint {
                date,
                yhat,
                lower: yhat - half,
                upper: yhat + half,
            });
        }

        tracing::debug!(observations = points.len(), drift, sigma, "fitted drift model");
        ForecastResult::new(output, points.len())
    }
}
