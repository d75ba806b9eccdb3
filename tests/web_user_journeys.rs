//! Behavior-driven tests for web user journeys
//!
//! These tests verify WHAT a user sees in the browser form and what API
//! clients receive, driving the router in-process without a socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use ferrocast_core::{HttpResponse, SYNTHETIC_CATALOG};
use ferrocast_tests::{
    app_for, synthetic_app, today, trending_bars, yahoo_chart_body, yahoo_pipeline,
    CannedHttpClient,
};
use serde_json::Value;
use tower::ServiceExt;

const BODY_LIMIT: usize = 16 * 1024 * 1024;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("body should be readable");
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/forecast")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("valid request")
}

// =============================================================================
// Web Journey: Form
// =============================================================================

#[tokio::test]
async fn user_can_open_the_form_and_sees_the_defaults() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The user opens the home page
    let (status, html) = send(app, get("/")).await;

    // Then: The form is pre-filled with AAPL, 100 days and a static light chart
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Stock Price Forecast</title>"), "missing title");
    assert!(html.contains("name=\"ticker\" value=\"AAPL\""));
    assert!(html.contains("name=\"horizon\" value=\"100\" min=\"30\" max=\"365\""));
    assert!(html.contains("<option value=\"light\" selected>"));
    assert!(html.contains("<option value=\"static\" selected>"));
    assert!(html.contains("Run Forecast"));
}

#[tokio::test]
async fn user_can_submit_the_form_and_sees_chart_summary_and_downloads() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The user submits a lowercase ticker with a dark theme
    let (status, html) = send(app, post_form("ticker=msft&horizon=60&theme=dark&chart=static")).await;

    // Then: The page shows the summary and the training time
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Forecast for "), "missing summary");
    assert!(html.contains("Model trained in "), "missing caption");

    // And: The chart and both downloads are embedded with ticker-based names
    assert!(html.contains("<img src=\"data:image/png;base64,"));
    assert!(html.contains("download=\"MSFT_stock_forecast.png\""));
    assert!(html.contains("download=\"MSFT_historical_data.csv\""));
    assert!(html.contains("data:text/csv;base64,"));

    // And: The page keeps the user's choices
    assert!(html.contains("<option value=\"dark\" selected>"));
    assert!(html.contains("background: #0e1117"));
}

#[tokio::test]
async fn user_can_request_a_candlestick_chart_from_the_form() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The user picks the candlestick chart
    let (status, html) = send(app, post_form("ticker=NVDA&horizon=30&chart=candlestick")).await;

    // Then: The SVG is inlined and no fallback warning is shown
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<figure class=\"chart candlestick\">"));
    assert!(html.contains("<svg"));
    assert!(!html.contains("class=\"warning\""));
}

#[tokio::test]
async fn when_user_submits_an_unknown_ticker_then_page_shows_no_data_error() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The user submits a ticker nobody lists
    let (status, html) = send(app, post_form("ticker=ZZZZZZ&horizon=100")).await;

    // Then: One readable error and the form to try again
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("role=\"alert\">No data found for ZZZZZZ.</p>"));
    assert!(html.contains("name=\"ticker\" value=\"ZZZZZZ\""));
}

#[tokio::test]
async fn when_user_submits_an_out_of_range_horizon_then_page_explains_the_limits() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The user asks for 400 days
    let (status, html) = send(app, post_form("ticker=AAPL&horizon=400")).await;

    // Then: The request is rejected before any data is fetched
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("forecast horizon 400 is outside 30..=365 days"));
}

#[tokio::test]
async fn when_user_submits_markup_as_ticker_then_it_is_escaped() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The ticker field carries an HTML tag
    let (status, html) = send(app, post_form("ticker=%3Cscript%3E&horizon=100")).await;

    // Then: The input is echoed escaped, never as live markup
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("value=\"&lt;script&gt;\""));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn when_the_source_is_down_then_page_reports_a_bad_gateway() {
    // Given: Yahoo answering every request with 503
    let client = CannedHttpClient::new(Ok(HttpResponse::new(503, "")));
    let app = app_for(yahoo_pipeline(client));

    // When: The user submits the form
    let (status, html) = send(app, post_form("ticker=AAPL&horizon=100")).await;

    // Then: The upstream failure is visible to the user
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("Data source error: yahoo returned status 503"), "missing error");
}

// =============================================================================
// Web Journey: JSON API
// =============================================================================

#[tokio::test]
async fn api_client_can_fetch_a_forecast_as_json() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: A client asks for 30 days of the drift model
    let (status, body) = send(app, get("/api/forecast?ticker=spy&horizon=30&model=drift")).await;

    // Then: The body describes the run and its future points
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["ticker"], "SPY");
    assert_eq!(json["model"], "drift");
    assert_eq!(json["horizon"], 30);
    assert_eq!(json["currency"], "USD");

    let forecast = json["forecast"].as_array().expect("forecast array");
    assert_eq!(forecast.len(), 30);
    for point in forecast {
        let value = point["value"].as_f64().expect("value");
        assert!(point["lower"].as_f64().expect("lower") <= value);
        assert!(value <= point["upper"].as_f64().expect("upper"));
    }

    // And: The summary matches the final forecast point's date
    let last_date = forecast[29]["date"].as_str().expect("date");
    let summary = json["summary"].as_str().expect("summary");
    assert!(summary.starts_with(&format!("Forecast for {last_date}: $")), "{summary}");
}

#[tokio::test]
async fn when_api_client_omits_the_ticker_then_error_is_structured_json() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The ticker parameter is missing
    let (status, body) = send(app, get("/api/forecast?horizon=30")).await;

    // Then: A validation error with code and message
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["error"]["code"], "validation");
    assert_eq!(json["error"]["message"], "ticker cannot be empty");
}

#[tokio::test]
async fn when_api_client_asks_for_an_unknown_ticker_then_code_is_no_data() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The ticker has no history
    let (status, body) = send(app, get("/api/forecast?ticker=ZZZZZZ")).await;

    // Then: The error code lets the client branch without parsing text
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["error"]["code"], "no_data");
}

#[tokio::test]
async fn every_catalog_ticker_can_be_forecast_through_the_api() {
    for symbol in SYNTHETIC_CATALOG {
        // Given: A fresh app per request
        let app = synthetic_app();

        // When: The default horizon is requested
        let (status, body) = send(app, get(&format!("/api/forecast?ticker={symbol}"))).await;

        // Then: Every ticker yields the default 100 future days
        assert_eq!(status, StatusCode::OK, "{symbol}: {body}");
        let json: Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(json["forecast"].as_array().map(Vec::len), Some(100), "{symbol}");
    }
}

// =============================================================================
// Web Journey: Unusable History
// =============================================================================

fn yahoo_app_with_closes(symbol: &str, days: usize, keep_closes: bool) -> Router {
    let end = today().previous_day().expect("valid date");
    let bars: Vec<_> = trending_bars(end, days, 80.0)
        .into_iter()
        .map(|bar| if keep_closes { bar } else { bar.without_close() })
        .collect();
    app_for(yahoo_pipeline(CannedHttpClient::ok_json(yahoo_chart_body(symbol, "USD", &bars))))
}

#[tokio::test]
async fn when_history_has_no_closing_prices_then_both_surfaces_report_empty_series() {
    // Given: Yahoo returns bars whose closes are all null
    let form_app = yahoo_app_with_closes("AAPL", 10, false);
    let api_app = yahoo_app_with_closes("AAPL", 10, false);

    // When: The form is submitted and the API is called
    let (form_status, html) = send(form_app, post_form("ticker=AAPL&horizon=30")).await;
    let (api_status, body) = send(api_app, get("/api/forecast?ticker=AAPL&horizon=30")).await;

    // Then: The page shows the cleaning failure as the only error
    assert_eq!(form_status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("role=\"alert\">No usable closing prices for AAPL after cleaning.</p>"));

    // And: The API carries a branchable code
    assert_eq!(api_status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["error"]["code"], "empty_series");
}

#[tokio::test]
async fn when_history_is_a_single_day_then_both_surfaces_report_model_fit() {
    // Given: Yahoo returns one trading day
    let form_app = yahoo_app_with_closes("NEWCO", 1, true);
    let api_app = yahoo_app_with_closes("NEWCO", 1, true);

    // When: The form is submitted and the API is called
    let (form_status, html) = send(form_app, post_form("ticker=NEWCO&horizon=30")).await;
    let (api_status, body) = send(api_app, get("/api/forecast?ticker=NEWCO&horizon=30")).await;

    // Then: The page explains that the model needs more history
    assert_eq!(form_status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("Forecast failed: at least 2 observations are required, got 1"));

    // And: The API reports the fit failure
    assert_eq!(api_status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["error"]["code"], "model_fit");
    assert_eq!(
        json["error"]["message"],
        "Forecast failed: at least 2 observations are required, got 1"
    );
}

// =============================================================================
// Web Journey: Operations
// =============================================================================

#[tokio::test]
async fn operator_can_probe_health_and_see_the_source() {
    // Given: The app with the synthetic source
    let app = synthetic_app();

    // When: The health endpoint is probed
    let (status, body) = send(app, get("/health")).await;

    // Then: It reports ok and names the configured source
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["source"], "synthetic");
}
