//! # Chart Rendering
//!
//! | Function | Output |
//! |----------|--------|
//! | [`render_static`] | PNG: actual line, dashed prediction, shaded band |
//! | [`render_candlestick`] | SVG candlestick chart from the raw OHLC table |
//!
//! Both charts are drawn with plotters. The PNG path rasterizes into an
//! in-memory RGB buffer and encodes it with the `image` crate, so nothing
//! touches the filesystem. Text uses a font registered once per process
//! (see [`install_font`]).

mod candlestick;
mod font;
mod forecast_chart;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

use crate::{Column, ValidationError};

pub use candlestick::{render_candlestick, CandlestickChart};
pub use font::{install_font, load_font_file};
pub use forecast_chart::{render_static, render_static_sized, ChartLayout, StaticChart, DEFAULT_CHART_SIZE};

/// Rendering failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("candlestick chart unavailable: table has no {} column(s)", join_columns(.missing))]
    Unavailable { missing: Vec<Column> },

    #[error("nothing to plot")]
    EmptyInput,

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("font setup failed: {0}")]
    Font(String),
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| column.header())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Light or dark colour scheme. Affects colours only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub(crate) const fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: RGBColor(255, 255, 255),
                foreground: RGBColor(33, 37, 41),
                grid: RGBColor(200, 200, 200),
                actual: RGBColor(31, 119, 180),
                predicted: RGBColor(255, 127, 14),
                band: RGBColor(255, 187, 120),
                gain: RGBColor(38, 166, 91),
                loss: RGBColor(214, 39, 40),
            },
            Self::Dark => Palette {
                background: RGBColor(14, 17, 23),
                foreground: RGBColor(230, 230, 230),
                grid: RGBColor(70, 74, 82),
                actual: RGBColor(100, 181, 246),
                predicted: RGBColor(255, 167, 38),
                band: RGBColor(255, 204, 128),
                gain: RGBColor(102, 187, 106),
                loss: RGBColor(239, 83, 80),
            },
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ValidationError::InvalidOption {
                option: "theme",
                value: other.to_owned(),
                expected: "light, dark",
            }),
        }
    }
}

/// Which chart the shell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Static,
    Candlestick,
}

impl ChartKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Candlestick => "candlestick",
        }
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "candlestick" => Ok(Self::Candlestick),
            other => Err(ValidationError::InvalidOption {
                option: "chart",
                value: other.to_owned(),
                expected: "static, candlestick",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
    pub actual: RGBColor,
    pub predicted: RGBColor,
    pub band: RGBColor,
    pub gain: RGBColor,
    pub loss: RGBColor,
}

fn draw_error(error: impl Display) -> RenderError {
    RenderError::Draw(error.to_string())
}

fn axis_date_label(julian_day: i32) -> String {
    Date::from_julian_day(julian_day)
        .map(|date| date.to_string())
        .unwrap_or_default()
}

fn price_axis_label(currency: Option<&str>) -> String {
    format!("Price ({})", currency.unwrap_or("USD"))
}
