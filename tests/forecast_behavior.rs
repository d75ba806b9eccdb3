//! Behavior-driven tests for forecasting
//!
//! These tests verify WHAT a forecast looks like for realistic histories:
//! its length, its ordering, and the shape of its uncertainty band.

use ferrocast_core::{
    normalize, AdditiveForecaster, DateRange, DriftForecaster, ForecastHorizon, Forecaster,
    HistoryRequest, IntervalWidth, ModelKind, PriceSource, RawPriceTable, SyntheticSource,
};
use ferrocast_tests::{ticker, today};

async fn three_year_history(symbol: &str) -> RawPriceTable {
    let range = DateRange::lookback(today(), 3).expect("valid lookback");
    SyntheticSource::new()
        .history(HistoryRequest::new(ticker(symbol), range))
        .await
        .expect("synthetic source never fails")
        .expect("catalog ticker has history")
}

// =============================================================================
// Forecast: Horizon and Ordering
// =============================================================================

#[tokio::test]
async fn when_horizon_is_minimum_then_forecast_extends_thirty_days_past_history() {
    // Given: Three years of daily closes
    let series = normalize(&three_year_history("AAPL").await).expect("usable closes");
    let horizon = ForecastHorizon::new(30).expect("valid horizon");

    // When: The additive model is fitted
    let forecast = AdditiveForecaster::default()
        .fit(&series, horizon)
        .expect("fit should succeed");

    // Then: One prediction per history day plus thirty future days
    assert_eq!(forecast.history_len(), series.len());
    assert_eq!(forecast.future().len(), 30);
    assert_eq!(forecast.len(), series.len() + 30);

    // And: Future dates are consecutive calendar days after the last close
    let last_close = series.last().expect("non-empty").date;
    let first_future = forecast.future().first().expect("has future").date;
    assert_eq!(first_future, last_close.next_day().expect("valid date"));
    for pair in forecast.future().windows(2) {
        assert_eq!(pair[1].date, pair[0].date.next_day().expect("valid date"));
    }
}

#[tokio::test]
async fn when_horizon_is_maximum_then_every_point_is_finite_and_ordered() {
    // Given: Three years of daily closes
    let series = normalize(&three_year_history("MSFT").await).expect("usable closes");
    let horizon = ForecastHorizon::new(365).expect("valid horizon");

    // When: The additive model is fitted for a full year ahead
    let forecast = AdditiveForecaster::default()
        .fit(&series, horizon)
        .expect("fit should succeed");

    // Then: A year of future points, each finite with lower <= yhat <= upper
    assert_eq!(forecast.future().len(), 365);
    for point in forecast.points() {
        assert!(point.yhat.is_finite(), "yhat must be finite on {}", point.date);
        assert!(point.lower <= point.yhat, "lower above yhat on {}", point.date);
        assert!(point.yhat <= point.upper, "upper below yhat on {}", point.date);
    }

    // And: Dates strictly increase across history and future
    for pair in forecast.points().windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
}

#[test]
fn when_horizon_is_out_of_range_then_it_is_rejected_before_fitting() {
    // Given/When: Horizons just outside the slider bounds
    let too_short = ForecastHorizon::new(29);
    let too_long = ForecastHorizon::new(366);

    // Then: Both are validation errors naming the allowed range
    let message = too_short.expect_err("29 days is too short").to_string();
    assert!(message.contains("30..=365"), "unexpected message: {message}");
    assert!(too_long.is_err());
}

// =============================================================================
// Forecast: Uncertainty Band
// =============================================================================

#[tokio::test]
async fn when_forecasting_further_ahead_then_the_band_does_not_narrow() {
    // Given: A fitted additive forecast
    let series = normalize(&three_year_history("SPY").await).expect("usable closes");
    let forecast = AdditiveForecaster::default()
        .fit(&series, ForecastHorizon::default())
        .expect("fit should succeed");

    // When: Comparing band widths across the future
    let widths: Vec<f64> = forecast
        .future()
        .iter()
        .map(|point| point.upper - point.lower)
        .collect();

    // Then: Each day is at least as uncertain as the one before
    for pair in widths.windows(2) {
        assert!(pair[1] + 1e-9 >= pair[0], "band narrowed: {} -> {}", pair[0], pair[1]);
    }
}

#[tokio::test]
async fn when_interval_width_grows_then_the_band_widens() {
    // Given: The same history
    let series = normalize(&three_year_history("QQQ").await).expect("usable closes");
    let horizon = ForecastHorizon::new(60).expect("valid horizon");

    // When: Fitting with a 50% and a 95% band
    let narrow = AdditiveForecaster::new(IntervalWidth::new(0.5).expect("valid width"))
        .fit(&series, horizon)
        .expect("fit should succeed");
    let wide = AdditiveForecaster::new(IntervalWidth::new(0.95).expect("valid width"))
        .fit(&series, horizon)
        .expect("fit should succeed");

    // Then: The central prediction is unchanged and the band is wider
    let narrow_last = narrow.last().expect("non-empty");
    let wide_last = wide.last().expect("non-empty");
    assert!((narrow_last.yhat - wide_last.yhat).abs() < 1e-9);
    assert!(wide_last.upper - wide_last.lower > narrow_last.upper - narrow_last.lower);
}

// =============================================================================
// Forecast: Model Selection
// =============================================================================

#[tokio::test]
async fn when_each_model_is_selected_then_both_produce_a_complete_forecast() {
    // Given: Three years of daily closes
    let series = normalize(&three_year_history("NVDA").await).expect("usable closes");
    let horizon = ForecastHorizon::new(45).expect("valid horizon");

    for kind in ModelKind::ALL {
        // When: The model is built from its kind
        let forecast = kind
            .forecaster(IntervalWidth::default())
            .fit(&series, horizon)
            .unwrap_or_else(|e| panic!("{kind} fit failed: {e}"));

        // Then: History and horizon are both covered
        assert_eq!(forecast.history_len(), series.len(), "{kind}");
        assert_eq!(forecast.future().len(), 45, "{kind}");
    }
}

#[tokio::test]
async fn when_drift_model_is_used_then_forecast_continues_the_average_slope() {
    // Given: A history and the drift model
    let series = normalize(&three_year_history("TSLA").await).expect("usable closes");
    let first = series.first().expect("non-empty");
    let last = series.last().expect("non-empty");
    let span = (last.date - first.date).whole_days() as f64;
    let slope = (last.close - first.close) / span;

    // When: Forecasting thirty days ahead
    let forecast = DriftForecaster::default()
        .fit(&series, ForecastHorizon::new(30).expect("valid horizon"))
        .expect("fit should succeed");

    // Then: Day 30 sits thirty average steps past the last close
    let day_30 = forecast.last().expect("non-empty");
    assert!((day_30.yhat - (last.close + 30.0 * slope)).abs() < 1e-6);
}
