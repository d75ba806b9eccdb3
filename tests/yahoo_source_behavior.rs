//! Behavior-driven tests for the Yahoo price source
//!
//! These tests verify HOW chart responses become price tables and forecast
//! runs, using canned HTTP responses instead of the network.

use ferrocast_core::{
    DateRange, HistoryRequest, HttpError, HttpResponse, ModelFitError, PipelineConfig,
    PipelineError, PriceSource, SourceErrorKind, YahooAdapter,
};
use ferrocast_tests::{
    ticker, today, trending_bars, yahoo_chart_body, yahoo_not_found_body, yahoo_pipeline,
    CannedHttpClient,
};

fn last_trading_day() -> time::Date {
    today().previous_day().expect("valid date")
}

// =============================================================================
// Yahoo: Successful Fetches
// =============================================================================

#[tokio::test]
async fn when_yahoo_returns_a_chart_then_rows_land_on_exchange_dates() {
    // Given: Five trading days of AAPL bars
    let bars = trending_bars(last_trading_day(), 5, 190.0);
    let client = CannedHttpClient::ok_json(yahoo_chart_body("AAPL", "USD", &bars));
    let adapter = YahooAdapter::with_http_client(client.clone());
    let range = DateRange::lookback(today(), 3).expect("valid lookback");

    // When: History is requested
    let table = adapter
        .history(HistoryRequest::new(ticker("AAPL"), range))
        .await
        .expect("fetch should succeed")
        .expect("ticker has data");

    // Then: One row per bar on the bar's own calendar date
    assert_eq!(table.len(), 5);
    for (row, bar) in table.rows().iter().zip(&bars) {
        assert_eq!(row.date, bar.date);
        assert_eq!(row.close, bar.close);
    }
    assert_eq!(table.currency(), Some("USD"));

    // And: Exactly one chart request was made for the ticker
    let urls = client.recorded_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("/v8/finance/chart/AAPL"), "{}", urls[0]);
    assert!(urls[0].contains("interval=1d"), "{}", urls[0]);
}

#[tokio::test]
async fn user_can_forecast_from_yahoo_history_in_a_foreign_currency() {
    // Given: A year of EUR-quoted bars with one missing close
    let mut bars = trending_bars(last_trading_day(), 260, 50.0);
    bars[100] = bars[100].without_close();
    let client = CannedHttpClient::ok_json(yahoo_chart_body("SAP", "EUR", &bars));
    let pipeline = yahoo_pipeline(client);

    // When: The forecast runs
    let run = pipeline
        .forecast(&PipelineConfig::new(ticker("SAP")), today())
        .await
        .expect("forecast should succeed");

    // Then: The missing close is dropped before fitting
    assert_eq!(run.table.len(), 260);
    assert_eq!(run.series.len(), 259);

    // And: Prices are labelled with the ISO code instead of a dollar sign
    let summary = run.summary.to_string();
    assert!(summary.contains(": EUR "), "{summary}");
    assert!(!summary.contains('$'), "{summary}");
}

// =============================================================================
// Yahoo: Absence and Failure
// =============================================================================

#[tokio::test]
async fn when_yahoo_does_not_know_the_symbol_then_user_sees_no_data() {
    // Given: Yahoo answers with its "Not Found" chart error
    let client = CannedHttpClient::ok_json(yahoo_not_found_body());
    let pipeline = yahoo_pipeline(client);

    // When: The forecast runs
    let error = pipeline
        .forecast(&PipelineConfig::new(ticker("ZZZZZZ")), today())
        .await
        .expect_err("must fail");

    // Then: It reads like an empty result, not an outage
    assert_eq!(error.to_string(), "No data found for ZZZZZZ.");
}

#[tokio::test]
async fn when_yahoo_returns_404_then_user_sees_no_data() {
    // Given: An HTTP 404
    let client = CannedHttpClient::new(Ok(HttpResponse::new(404, "")));
    let pipeline = yahoo_pipeline(client);

    // When: The forecast runs
    let error = pipeline
        .forecast(&PipelineConfig::new(ticker("QQQQ")), today())
        .await
        .expect_err("must fail");

    // Then: The ticker simply has no data
    assert!(matches!(error, PipelineError::NoData { .. }), "{error:?}");
}

#[tokio::test]
async fn when_yahoo_is_down_then_the_error_is_an_upstream_failure() {
    // Given: An HTTP 503
    let client = CannedHttpClient::new(Ok(HttpResponse::new(503, "service unavailable")));
    let pipeline = yahoo_pipeline(client);

    // When: The forecast runs
    let error = pipeline
        .forecast(&PipelineConfig::new(ticker("AAPL")), today())
        .await
        .expect_err("must fail");

    // Then: It is a source error the user cannot fix by changing input
    let PipelineError::Source(source) = &error else {
        panic!("expected source error, got {error:?}");
    };
    assert_eq!(source.kind(), SourceErrorKind::Unavailable);
    assert!(source.message().contains("503"), "{}", source.message());
    assert!(!error.is_user_error());
}

#[tokio::test]
async fn when_the_request_times_out_then_the_error_mentions_the_transport() {
    // Given: A transport timeout
    let client = CannedHttpClient::new(Err(HttpError::timeout("request timed out")));
    let pipeline = yahoo_pipeline(client);

    // When: The forecast runs
    let error = pipeline
        .forecast(&PipelineConfig::new(ticker("AAPL")), today())
        .await
        .expect_err("must fail");

    // Then: A source error carrying the transport message
    assert!(matches!(error, PipelineError::Source(_)), "{error:?}");
    assert!(error.to_string().contains("timed out"), "{error}");
}

// =============================================================================
// Yahoo: Unusable History
// =============================================================================

#[tokio::test]
async fn when_every_close_is_missing_then_user_sees_no_usable_prices() {
    // Given: Bars that carry OHLC but no closing prices at all
    let bars: Vec<_> = trending_bars(last_trading_day(), 10, 120.0)
        .into_iter()
        .map(|bar| bar.without_close())
        .collect();
    let client = CannedHttpClient::ok_json(yahoo_chart_body("AAPL", "USD", &bars));
    let pipeline = yahoo_pipeline(client);

    // When: The full run is attempted
    let error = pipeline
        .run(&PipelineConfig::new(ticker("AAPL")), today())
        .await
        .expect_err("must fail");

    // Then: Cleaning leaves nothing, reported as the user's problem
    assert!(matches!(error, PipelineError::EmptySeries { .. }), "{error:?}");
    assert_eq!(error.to_string(), "No usable closing prices for AAPL after cleaning.");
    assert!(error.is_user_error());
}

#[tokio::test]
async fn when_only_one_trading_day_exists_then_the_model_refuses_to_fit() {
    // Given: A single bar of history
    let bars = trending_bars(last_trading_day(), 1, 42.0);
    let client = CannedHttpClient::ok_json(yahoo_chart_body("NEWCO", "USD", &bars));
    let pipeline = yahoo_pipeline(client);

    // When: The full run is attempted
    let error = pipeline
        .run(&PipelineConfig::new(ticker("NEWCO")), today())
        .await
        .expect_err("must fail");

    // Then: The fit error names how many observations were needed
    assert!(
        matches!(
            error,
            PipelineError::ModelFit(ModelFitError::InsufficientData { required: 2, actual: 1 })
        ),
        "{error:?}"
    );
    assert_eq!(
        error.to_string(),
        "Forecast failed: at least 2 observations are required, got 1"
    );
    assert!(error.is_user_error());
}
