use std::f64::consts::TAU;

use time::Date;

use super::{
    future_dates, require_points, ForecastPoint, ForecastResult, Forecaster, IntervalWidth,
    ModelFitError,
};
use crate::{ForecastHorizon, PriceSeries};

const WEEKLY_PERIOD: f64 = 7.0;
const YEARLY_PERIOD: f64 = 365.25;
const WEEKLY_ORDER: usize = 3;
const YEARLY_ORDER: usize = 6;
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;
const YEARLY_MIN_SPAN_DAYS: i64 = 730;
const SEASONAL_PENALTY: f64 = 1.0;
const PIVOT_EPSILON: f64 = 1e-12;

/// Additive trend + seasonality model.
///
/// `y(t) = a + b·t + weekly(t) + yearly(t)`, fitted by least squares with a
/// ridge penalty on the Fourier coefficients only. Seasonal terms are enabled
/// once the series spans enough days to identify them.
///
/// The band combines residual noise with a random-walk term that grows with
/// the distance past the last observation:
/// `z · sqrt(σ² + h · σ_rw²)`.
#[derive(Debug, Clone, Copy)]
pub struct AdditiveForecaster {
    interval: IntervalWidth,
}

impl Default for AdditiveForecaster {
    fn default() -> Self {
        Self::new(IntervalWidth::default())
    }
}

impl AdditiveForecaster {
    pub fn new(interval: IntervalWidth) -> Self {
        Self { interval }
    }
}

impl Forecaster for AdditiveForecaster {
    fn name(&self) -> &'static str {
        "additive"
    }

    fn fit(
        &self,
        series: &PriceSeries,
        horizon: ForecastHorizon,
    ) -> Result<ForecastResult, ModelFitError> {
        require_points(series, 2)?;
        let points = series.points();
        let (first, last) = (points[0].date, points[points.len() - 1].date);
        let design = Design::spanning(first, last);
        let width = design.width();

        let mut normal = vec![vec![0.0; width]; width];
        let mut rhs = vec![0.0; width];
        let mut rows = Vec::with_capacity(points.len());
        for point in points {
            let row = design.row(point.date);
            for i in 0..width {
                rhs[i] += row[i] * point.close;
                for j in 0..width {
                    normal[i][j] += row[i] * row[j];
                }
            }
            rows.push(row);
        }
        for (index, row) in normal.iter_mut().enumerate().skip(2) {
            row[index] += SEASONAL_PENALTY;
        }

        let beta = solve(normal, rhs)?;
        if beta.iter().any(|value| !value.is_finite()) {
            return Err(ModelFitError::NonFiniteOutput {
                date: last.to_string(),
            });
        }

        let fitted: Vec<f64> = rows.iter().map(|row| dot(row, &beta)).collect();
        let residuals: Vec<f64> = points
            .iter()
            .zip(&fitted)
            .map(|(point, yhat)| point.close - yhat)
            .collect();

        let dof = points.len().saturating_sub(2).max(1) as f64;
        let noise_var = residuals.iter().map(|r| r * r).sum::<f64>() / dof;
        let walk_var = points
            .windows(2)
            .zip(residuals.windows(2))
            .map(|(dates, pair)| {
                let gap = (dates[1].date - dates[0].date).whole_days().max(1) as f64;
                (pair[1] - pair[0]).powi(2) / gap
            })
            .sum::<f64>()
            / (points.len() - 1) as f64;

        let z = self.interval.z()?;
        let band = |days_ahead: i64| z * (noise_var + days_ahead as f64 * walk_var).sqrt();

        let mut output = Vec::with_capacity(points.len() + horizon.days() as usize);
        for (point, yhat) in points.iter().zip(&fitted) {
            let half = band(0);
            output.push(ForecastPoint {
                date: point.date,
                yhat: *yhat,
                lower: yhat - half,
                upper: yhat + half,
            });
        }
        for date in future_dates(last, horizon) {
            let yhat = dot(&design.row(date), &beta);
            let half = band((date - last).whole_days());
            output.push(ForecastPoint {
                date,
                yhat,
                lower: yhat - half,
                upper: yhat + half,
            });
        }

        tracing::debug!(
            observations = points.len(),
            features = width,
            sigma = noise_var.sqrt(),
            sigma_walk = walk_var.sqrt(),
            "fitted additive model"
        );

        ForecastResult::new(output, points.len())
    }
}

/// Feature layout: intercept, scaled trend, weekly and yearly Fourier pairs.
#[derive(Debug, Clone, Copy)]
struct Design {
    origin: Date,
    span_days: f64,
    weekly_order: usize,
    yearly_order: usize,
}

impl Design {
    fn spanning(first: Date, last: Date) -> Self {
        let span = (last - first).whole_days();
        Self {
            origin: first,
            span_days: span.max(1) as f64,
            weekly_order: if span >= WEEKLY_MIN_SPAN_DAYS { WEEKLY_ORDER } else { 0 },
            yearly_order: if span >= YEARLY_MIN_SPAN_DAYS { YEARLY_ORDER } else { 0 },
        }
    }

    fn width(&self) -> usize {
        2 + 2 * (self.weekly_order + self.yearly_order)
    }

    fn row(&self, date: Date) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        row.push((date - self.origin).whole_days() as f64 / self.span_days);

        let day = f64::from(date.to_julian_day());
        push_fourier(&mut row, day.rem_euclid(WEEKLY_PERIOD), WEEKLY_PERIOD, self.weekly_order);
        push_fourier(&mut row, day.rem_euclid(YEARLY_PERIOD), YEARLY_PERIOD, self.yearly_order);
        row
    }
}

fn push_fourier(row: &mut Vec<f64>, phase_day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let angle = TAU * k as f64 * phase_day / period;
        row.push(angle.sin());
        row.push(angle.cos());
    }
}

fn dot(row: &[f64], beta: &[f64]) -> f64 {
    row.iter().zip(beta).map(|(x, b)| x * b).sum()
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelFitError> {
    let n = b.len();
    let scale = (0..n).map(|i| a[i][i].abs()).fold(1.0_f64, f64::max);

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .ok_or(ModelFitError::SingularSystem)?;
        if a[pivot][col].abs() <= scale * PIVOT_EPSILON {
            return Err(ModelFitError::SingularSystem);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        let pivot_row = a[col].clone();
        for row in col + 1..n {
            let factor = a[row][col] / pivot_row[col];
            if factor == 0.0 {
                continue;
            }
            for (k, value) in pivot_row.iter().enumerate().skip(col) {
                a[row][k] -= factor * value;
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}
