//! Command-line options for the `ferrocast` server.
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--bind` | `FERROCAST_BIND` | `127.0.0.1:8501` | Listen address |
//! | `--source` | `FERROCAST_SOURCE` | `yahoo` | Price source (yahoo, synthetic) |
//! | `--timeout-ms` | `FERROCAST_TIMEOUT_MS` | `30000` | Upstream request timeout |
//! | `--lookback-years` | `FERROCAST_LOOKBACK_YEARS` | `3` | History window |
//! | `--interval-width` | `FERROCAST_INTERVAL_WIDTH` | `0.8` | Uncertainty band coverage |
//! | `--font` | `FERROCAST_FONT` | embedded | TTF/OTF used for chart text |
//!
//! # Examples
//!
//! ```bash
//! # Serve the form on the default port
//! ferrocast
//!
//! # Offline demo data, reachable from other machines
//! ferrocast --source synthetic --bind 0.0.0.0:8501
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use ferrocast_core::http_client::DEFAULT_TIMEOUT_MS;
use ferrocast_core::{IntervalWidth, ProviderId, DEFAULT_LOOKBACK_YEARS};

/// Stock price forecast server.
///
/// Fetches daily history for a ticker, fits an additive trend and
/// seasonality model, and serves the forecast chart with PNG and CSV
/// downloads.
#[derive(Debug, Parser)]
#[command(name = "ferrocast", author, version, about = "Stock price forecast web UI")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "FERROCAST_BIND", default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Price history source.
    #[arg(long, env = "FERROCAST_SOURCE", default_value = "yahoo")]
    pub source: ProviderId,

    /// Upstream request timeout in milliseconds.
    #[arg(long, env = "FERROCAST_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Years of daily history to fit on.
    #[arg(long, env = "FERROCAST_LOOKBACK_YEARS", default_value_t = DEFAULT_LOOKBACK_YEARS)]
    pub lookback_years: u8,

    /// Probability mass covered by the forecast band, strictly between 0 and 1.
    #[arg(long, env = "FERROCAST_INTERVAL_WIDTH", default_value_t = IntervalWidth::DEFAULT)]
    pub interval_width: f64,

    /// Font file for chart text instead of the embedded sans font.
    #[arg(long, env = "FERROCAST_FONT")]
    pub font: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["ferrocast"]).expect("defaults parse");
        assert_eq!(cli.bind, "127.0.0.1:8501".parse::<SocketAddr>().expect("addr"));
        assert_eq!(cli.source, ProviderId::Yahoo);
        assert_eq!(cli.timeout_ms, 30_000);
        assert_eq!(cli.lookback_years, 3);
        assert!((cli.interval_width - 0.8).abs() < f64::EPSILON);
        assert!(cli.font.is_none());
    }

    #[test]
    fn unknown_source_is_rejected() {
        let err = Cli::try_parse_from(["ferrocast", "--source", "polygon"]).expect_err("must fail");
        assert!(err.to_string().contains("polygon"));
    }
}
