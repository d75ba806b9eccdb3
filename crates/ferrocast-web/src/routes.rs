use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use ferrocast_core::{ForecastRun, PipelineError, ValidationError};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::form::{ApiQuery, ForecastForm};
use crate::page::{error_page, form_page, result_page};
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/forecast", post(submit_forecast))
        .route("/api/forecast", get(api_forecast))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(form_page(&ForecastForm::default()))
}

async fn submit_forecast(State(state): State<AppState>, Form(form): Form<ForecastForm>) -> Response {
    let config = match form.to_config() {
        Ok(config) => state.apply_defaults(config),
        Err(error) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(error_page(&form, &error.to_string()))).into_response();
        }
    };

    match state.pipeline().run(&config, state.today()).await {
        Ok(output) => Html(result_page(&form, &output)).into_response(),
        Err(error) => (status_for(&error), Html(error_page(&form, &error.to_string()))).into_response(),
    }
}

async fn api_forecast(State(state): State<AppState>, Query(query): Query<ApiQuery>) -> Response {
    let config = match query.to_config() {
        Ok(config) => state.apply_defaults(config),
        Err(error) => return validation_response(&error),
    };

    match state.pipeline().forecast(&config, state.today()).await {
        Ok(run) => Json(ForecastBody::from_run(&run, config.horizon.days())).into_response(),
        Err(error) => error_response(&error),
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        source: state.pipeline().source_id().as_str(),
    })
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    source: &'static str,
}

#[derive(Debug, Serialize)]
struct ForecastBody {
    ticker: String,
    currency: Option<String>,
    model: &'static str,
    horizon: u32,
    summary: String,
    fit_seconds: f64,
    history_points: usize,
    last_close: PointBody,
    forecast: Vec<PointBody>,
}

#[derive(Debug, Serialize)]
struct PointBody {
    date: String,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<f64>,
}

impl ForecastBody {
    fn from_run(run: &ForecastRun, horizon: u32) -> Self {
        let last_close = run
            .series
            .last()
            .map(|point| PointBody {
                date: point.date.to_string(),
                value: point.close,
                lower: None,
                upper: None,
            })
            .unwrap_or(PointBody {
                date: String::new(),
                value: 0.0,
                lower: None,
                upper: None,
            });

        Self {
            ticker: run.series.ticker().to_string(),
            currency: run.series.currency().map(str::to_owned),
            model: run.model.as_str(),
            horizon,
            summary: run.summary.to_string(),
            fit_seconds: run.fit_elapsed.as_secs_f64(),
            history_points: run.forecast.history_len(),
            last_close,
            forecast: run
                .forecast
                .future()
                .iter()
                .map(|point| PointBody {
                    date: point.date.to_string(),
                    value: point.yhat,
                    lower: Some(point.lower),
                    upper: Some(point.upper),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Source(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Render(_) | PipelineError::Export(_) | PipelineError::Worker(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ if error.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_code(error: &PipelineError) -> &'static str {
    match error {
        PipelineError::NoData { .. } => "no_data",
        PipelineError::EmptySeries { .. } => "empty_series",
        PipelineError::ModelFit(_) => "model_fit",
        PipelineError::Source(source) => source.code(),
        PipelineError::Render(_) => "render",
        PipelineError::Export(_) => "export",
        PipelineError::Validation(_) => "validation",
        PipelineError::Worker(_) => "worker",
    }
}

fn error_response(error: &PipelineError) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: error_code(error),
            message: error.to_string(),
        },
    };
    (status_for(error), Json(body)).into_response()
}

fn validation_response(error: &ValidationError) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "validation",
            message: error.to_string(),
        },
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}
