use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use time::Date;

use super::font::ensure_font;
use super::{axis_date_label, draw_error, price_axis_label, RenderError, Theme};
use crate::forecast::ForecastResult;
use crate::PriceSeries;

pub const DEFAULT_CHART_SIZE: (u32, u32) = (1400, 600);

/// Axis ranges and point count of a rendered static chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub x_range: (Date, Date),
    pub y_range: (f64, f64),
    pub plotted_points: usize,
}

/// Encoded PNG plus the layout it was drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticChart {
    pub png: Vec<u8>,
    pub layout: ChartLayout,
    pub size: (u32, u32),
}

/// Static forecast chart at [`DEFAULT_CHART_SIZE`].
pub fn render_static(
    series: &PriceSeries,
    forecast: &ForecastResult,
    theme: Theme,
) -> Result<StaticChart, RenderError> {
    render_static_sized(series, forecast, theme, DEFAULT_CHART_SIZE)
}

/// Draws actual closes, the dashed prediction and its shaded band into a
/// `width × height` PNG.
pub fn render_static_sized(
    series: &PriceSeries,
    forecast: &ForecastResult,
    theme: Theme,
    (width, height): (u32, u32),
) -> Result<StaticChart, RenderError> {
    let (Some(first), Some(last_actual)) = (series.first(), series.last()) else {
        return Err(RenderError::EmptyInput);
    };
    let last_date = forecast
        .last()
        .map_or(last_actual.date, |point| point.date.max(last_actual.date));

    let layout = ChartLayout {
        x_range: (first.date, last_date),
        y_range: value_range(series, forecast),
        plotted_points: series.len() + forecast.len(),
    };

    ensure_font()?;
    let palette = theme.palette();
    let title = format!("{} Stock Price Forecast", series.ticker());
    let y_desc = price_axis_label(series.currency());
    let x_range = first.date.to_julian_day()..last_date.to_julian_day().max(first.date.to_julian_day() + 1);
    let (y_min, y_max) = layout.y_range;

    let mut buffer = vec![0_u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&palette.background).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 28).into_font().color(&palette.foreground))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .y_labels(10)
            .x_desc("Date")
            .y_desc(y_desc.as_str())
            .x_label_formatter(&|day| axis_date_label(*day))
            .y_label_formatter(&|price| format!("{price:.2}"))
            .label_style(("sans-serif", 14).into_font().color(&palette.foreground))
            .axis_desc_style(("sans-serif", 16).into_font().color(&palette.foreground))
            .axis_style(palette.foreground)
            .bold_line_style(palette.grid.mix(0.5))
            .light_line_style(palette.grid.mix(0.15))
            .draw()
            .map_err(draw_error)?;

        let mut band: Vec<(i32, f64)> = forecast
            .points()
            .iter()
            .map(|point| (point.date.to_julian_day(), point.upper))
            .collect();
        band.extend(
            forecast
                .points()
                .iter()
                .rev()
                .map(|point| (point.date.to_julian_day(), point.lower)),
        );
        let band_color = palette.band;
        chart
            .draw_series(std::iter::once(Polygon::new(band, band_color.mix(0.3).filled())))
            .map_err(draw_error)?
            .label("Confidence Interval")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], band_color.mix(0.3).filled()));

        let actual = palette.actual;
        chart
            .draw_series(LineSeries::new(
                series.points().iter().map(|point| (point.date.to_julian_day(), point.close)),
                actual.stroke_width(2),
            ))
            .map_err(draw_error)?
            .label("Actual")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], actual.stroke_width(2)));

        let predicted = palette.predicted;
        chart
            .draw_series(DashedLineSeries::new(
                forecast.points().iter().map(|point| (point.date.to_julian_day(), point.yhat)),
                8,
                5,
                predicted.stroke_width(2),
            ))
            .map_err(draw_error)?
            .label("Predicted")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], predicted.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(palette.background.mix(0.85))
            .border_style(palette.foreground)
            .label_font(("sans-serif", 14).into_font().color(&palette.foreground))
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&buffer, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode(e.to_string()))?;

    tracing::debug!(
        ticker = %series.ticker(),
        bytes = png.len(),
        points = layout.plotted_points,
        "rendered static chart"
    );

    Ok(StaticChart {
        png,
        layout,
        size: (width, height),
    })
}

/// Price range covering closes and forecast bounds, padded by 5%.
fn value_range(series: &PriceSeries, forecast: &ForecastResult) -> (f64, f64) {
    let closes = series.points().iter().map(|point| point.close);
    let lows = forecast.points().iter().map(|point| point.lower);
    let highs = forecast.points().iter().map(|point| point.upper);

    let min = closes.clone().chain(lows).fold(f64::INFINITY, f64::min);
    let max = closes.chain(highs).fold(f64::NEG_INFINITY, f64::max);
    let padding = match (max - min).abs() * 0.05 {
        pad if pad > 0.0 => pad,
        _ => 1.0,
    };
    (min - padding, max + padding)
}
