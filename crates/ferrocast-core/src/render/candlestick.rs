use plotters::prelude::*;

use super::font::ensure_font;
use super::{axis_date_label, draw_error, price_axis_label, RenderError, Theme};
use crate::{Column, RawPriceTable};

const CANDLESTICK_SIZE: (u32, u32) = (1400, 600);

/// SVG candlestick chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandlestickChart {
    pub svg: String,
    pub candles: usize,
}

/// One candle per row that has all four OHLC values.
///
/// # Errors
///
/// [`RenderError::Unavailable`] when the table lacks any OHLC column.
pub fn render_candlestick(table: &RawPriceTable, theme: Theme) -> Result<CandlestickChart, RenderError> {
    let missing = table.missing_columns(&Column::OHLC);
    if !missing.is_empty() {
        return Err(RenderError::Unavailable { missing });
    }

    let mut candles: Vec<(i32, f64, f64, f64, f64)> = table
        .rows()
        .iter()
        .filter_map(|row| Some((row.date.to_julian_day(), row.open?, row.high?, row.low?, row.close?)))
        .filter(|(_, open, high, low, close)| [open, high, low, close].iter().all(|v| v.is_finite()))
        .collect();
    candles.sort_by_key(|candle| candle.0);
    if candles.is_empty() {
        return Err(RenderError::EmptyInput);
    }

    let x_start = candles[0].0 - 1;
    let x_end = candles[candles.len() - 1].0 + 1;
    let low = candles.iter().map(|c| c.3).fold(f64::INFINITY, f64::min);
    let high = candles.iter().map(|c| c.2).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((high - low) * 0.05).max(0.5);

    ensure_font()?;
    let palette = theme.palette();
    let title = format!("{} Candlestick Chart", table.ticker());
    let y_desc = price_axis_label(table.currency());
    let (width, _) = CANDLESTICK_SIZE;
    let candle_width = ((width as usize * 7 / 10) / candles.len()).clamp(1, 12) as u32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CANDLESTICK_SIZE).into_drawing_area();
        root.fill(&palette.background).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 28).into_font().color(&palette.foreground))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_start..x_end, (low - padding)..(high + padding))
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_desc("Date")
            .y_desc(y_desc.as_str())
            .x_label_formatter(&|day| axis_date_label(*day))
            .label_style(("sans-serif", 14).into_font().color(&palette.foreground))
            .axis_style(palette.foreground)
            .bold_line_style(palette.grid.mix(0.5))
            .light_line_style(palette.grid.mix(0.15))
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(candles.iter().map(|&(day, open, high, low, close)| {
                CandleStick::new(
                    day,
                    open,
                    high,
                    low,
                    close,
                    palette.gain.filled(),
                    palette.loss.filled(),
                    candle_width,
                )
            }))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    tracing::debug!(ticker = %table.ticker(), candles = candles.len(), "rendered candlestick chart");
    Ok(CandlestickChart {
        svg,
        candles: candles.len(),
    })
}
