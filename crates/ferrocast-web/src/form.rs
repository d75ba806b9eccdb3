//! Form and query-string input, parsed into a [`PipelineConfig`].

use ferrocast_core::{
    ChartKind, ForecastHorizon, ModelKind, PipelineConfig, Theme, TickerSymbol, ValidationError,
};
use serde::Deserialize;

pub const DEFAULT_TICKER: &str = "AAPL";

/// Raw values submitted by the form. Kept as strings so the page can echo
/// back exactly what the user typed when validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForecastForm {
    pub ticker: String,
    pub horizon: String,
    pub theme: String,
    pub chart: String,
    pub model: String,
}

impl Default for ForecastForm {
    fn default() -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_owned(),
            horizon: ForecastHorizon::DEFAULT_DAYS.to_string(),
            theme: Theme::default().as_str().to_owned(),
            chart: ChartKind::default().as_str().to_owned(),
            model: ModelKind::default().as_str().to_owned(),
        }
    }
}

impl ForecastForm {
    pub fn to_config(&self) -> Result<PipelineConfig, ValidationError> {
        let ticker = TickerSymbol::parse(&self.ticker)?;
        let horizon = parse_horizon(&self.horizon)?;

        Ok(PipelineConfig::new(ticker)
            .with_horizon(horizon)
            .with_theme(parse_or_default(&self.theme)?)
            .with_chart(parse_or_default(&self.chart)?)
            .with_model(parse_or_default(&self.model)?))
    }

    /// Theme to paint the page with, falling back to light on bad input.
    pub fn theme(&self) -> Theme {
        self.theme.parse().unwrap_or_default()
    }
}

/// `GET /api/forecast` parameters. Only the ticker is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiQuery {
    pub ticker: Option<String>,
    pub horizon: Option<String>,
    pub model: Option<String>,
}

impl ApiQuery {
    pub fn to_config(&self) -> Result<PipelineConfig, ValidationError> {
        let ticker = TickerSymbol::parse(self.ticker.as_deref().unwrap_or_default())?;
        let horizon = match self.horizon.as_deref() {
            Some(raw) => parse_horizon(raw)?,
            None => ForecastHorizon::default(),
        };
        let model = parse_or_default(self.model.as_deref().unwrap_or_default())?;

        Ok(PipelineConfig::new(ticker)
            .with_horizon(horizon)
            .with_model(model))
    }
}

fn parse_horizon(raw: &str) -> Result<ForecastHorizon, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(ForecastHorizon::default());
    }
    let days = raw.parse::<u32>().map_err(|_| ValidationError::InvalidOption {
        option: "horizon",
        value: raw.to_owned(),
        expected: "a whole number of days between 30 and 365",
    })?;
    ForecastHorizon::new(days)
}

fn parse_or_default<T>(raw: &str) -> Result<T, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError> + Default,
{
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    raw.parse()
}
