mod cli;
mod error;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ferrocast_core::{
    install_font, load_font_file, DateRange, IntervalWidth, Pipeline, PriceSource, ProviderId,
    SyntheticSource, YahooAdapter,
};
use ferrocast_web::{router, AppState};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::WebError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, WebError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| WebError::Logging(e.to_string()))?;

    if let Some(path) = &cli.font {
        install_font(load_font_file(path)?)?;
        tracing::info!(font = %path.display(), "using custom chart font");
    }

    let interval_width = IntervalWidth::new(cli.interval_width)?;
    DateRange::lookback(OffsetDateTime::now_utc().date(), cli.lookback_years)?;

    let source: Arc<dyn PriceSource> = match cli.source {
        ProviderId::Yahoo => Arc::new(YahooAdapter::default().with_timeout_ms(cli.timeout_ms)),
        ProviderId::Synthetic => Arc::new(SyntheticSource::new()),
    };
    let state = AppState::new(Pipeline::new(source))
        .with_lookback_years(cli.lookback_years)
        .with_interval_width(interval_width);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .map_err(|source| WebError::Bind {
            addr: cli.bind,
            source,
        })?;
    tracing::info!(
        addr = %cli.bind,
        source = %cli.source,
        lookback_years = cli.lookback_years,
        "ferrocast listening"
    );

    axum::serve(listener, router(state))
        .await
        .map_err(WebError::Serve)?;

    Ok(ExitCode::SUCCESS)
}
