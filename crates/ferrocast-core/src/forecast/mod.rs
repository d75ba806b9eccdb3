//! # Forecast Models
//!
//! Every model implements [`Forecaster`]: given a [`PriceSeries`] and a
//! [`ForecastHorizon`] it returns a [`ForecastResult`] covering the
//! historical dates (in-sample fit) followed by `horizon` consecutive
//! calendar days.
//!
//! | Model | Description |
//! |-------|-------------|
//! | [`AdditiveForecaster`] | Linear trend plus weekly and yearly Fourier seasonality |
//! | [`DriftForecaster`] | Random walk with drift baseline |
//!
//! Fitting is CPU-bound and synchronous. Async callers should move it off the
//! runtime with `spawn_blocking`.

mod additive;
mod drift;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use time::{Date, Duration};

use crate::{ForecastHorizon, PriceSeries, ValidationError};

pub use additive::AdditiveForecaster;
pub use drift::DriftForecaster;

/// Errors raised while fitting a model or projecting its output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelFitError {
    #[error("at least {required} observations are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("design matrix is singular; series is too short or degenerate")]
    SingularSystem,

    #[error("model produced a non-finite value at {date}")]
    NonFiniteOutput { date: String },

    #[error("forecast bounds are inconsistent at {date}")]
    InconsistentBounds { date: String },

    #[error("forecast dates must be strictly increasing at {date}")]
    UnorderedDates { date: String },

    #[error("interval quantile unavailable: {0}")]
    Quantile(String),
}

/// One fitted or projected value with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: Date,
    pub yhat: f64,
    pub lower: f64,
    pub upper: f64,
}

/// In-sample fit plus out-of-sample projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    history_len: usize,
}

impl ForecastResult {
    /// Builds a result, checking finiteness, date order and
    /// `lower <= yhat <= upper` for every point.
    pub fn new(points: Vec<ForecastPoint>, history_len: usize) -> Result<Self, ModelFitError> {
        for point in &points {
            if !(point.yhat.is_finite() && point.lower.is_finite() && point.upper.is_finite()) {
                return Err(ModelFitError::NonFiniteOutput {
                    date: point.date.to_string(),
                });
            }
            if point.lower > point.yhat || point.yhat > point.upper {
                return Err(ModelFitError::InconsistentBounds {
                    date: point.date.to_string(),
                });
            }
        }

        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(ModelFitError::UnorderedDates {
                date: pair[1].date.to_string(),
            });
        }

        let history_len = history_len.min(points.len());
        Ok(Self {
            points,
            history_len,
        })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Points aligned with the input series.
    pub fn history(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len]
    }

    /// Points past the last observed date.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len..]
    }

    pub const fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Interchangeable forecasting model.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fits the model on `series` and projects `horizon` days past its end.
    ///
    /// # Errors
    ///
    /// Returns [`ModelFitError`] when the series is too short, the fit is
    /// numerically degenerate, or the output is not finite.
    fn fit(
        &self,
        series: &PriceSeries,
        horizon: ForecastHorizon,
    ) -> Result<ForecastResult, ModelFitError>;
}

/// Central probability mass covered by the uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct IntervalWidth(f64);

impl IntervalWidth {
    pub const DEFAULT: f64 = 0.8;

    pub fn new(width: f64) -> Result<Self, ValidationError> {
        if !(width.is_finite() && width > 0.0 && width < 1.0) {
            return Err(ValidationError::InvalidIntervalWidth {
                value: width.to_string(),
            });
        }
        Ok(Self(width))
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Two-sided standard normal quantile for this width.
    pub fn z(self) -> Result<f64, ModelFitError> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| ModelFitError::Quantile(e.to_string()))?;
        Ok(normal.inverse_cdf(0.5 + self.0 / 2.0))
    }
}

impl Default for IntervalWidth {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for IntervalWidth {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IntervalWidth> for f64 {
    fn from(value: IntervalWidth) -> Self {
        value.0
    }
}

/// Selects a [`Forecaster`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Additive,
    Drift,
}

impl ModelKind {
    pub const ALL: [Self; 2] = [Self::Additive, Self::Drift];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Drift => "drift",
        }
    }

    pub fn forecaster(self, interval: IntervalWidth) -> Box<dyn Forecaster> {
        match self {
            Self::Additive => Box::new(AdditiveForecaster::new(interval)),
            Self::Drift => Box::new(DriftForecaster::new(interval)),
        }
    }
}

impl Display for ModelKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "drift" => Ok(Self::Drift),
            other => Err(ValidationError::InvalidOption {
                option: "model",
                value: other.to_owned(),
                expected: "additive, drift",
            }),
        }
    }
}

/// `horizon` consecutive calendar days after `last`.
pub fn future_dates(last: Date, horizon: ForecastHorizon) -> Vec<Date> {
    (1..=i64::from(horizon.days()))
        .map(|offset| last.saturating_add(Duration::days(offset)))
        .collect()
}

fn require_points(series: &PriceSeries, required: usize) -> Result<(), ModelFitError> {
    if series.len() < required {
        return Err(ModelFitError::InsufficientData {
            required,
            actual: series.len(),
        });
    }
    Ok(())
}
