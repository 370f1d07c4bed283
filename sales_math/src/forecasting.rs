//! Autoregressive integrated forecasting
//!
//! [`Arima`] describes an ARIMA(p, d, 0) model. Fitting differences the input
//! `d` times and estimates the `p` autoregressive coefficients by conditional
//! least squares on the differenced series (no constant term). Forecasts are
//! produced on the differenced scale and integrated back onto the last
//! observed levels.
//!
//! Fitting is deterministic: the same input and order always yield the same
//! coefficients. A lag whose column in the normal equations carries no
//! information (a constant series, or sales on only a few isolated days) is
//! estimated as 0, so such a series forecasts a flat line at its last level.

use crate::{MathError, Result};
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Relative pivot tolerance used when solving the normal equations
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Apply `order` rounds of first differencing
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut current = values.to_vec();
    for _ in 0..order {
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    current
}

/// ARIMA(p, d, q) model specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arima {
    p: usize,
    d: usize,
    q: usize,
}

/// Fitted ARIMA model, ready to forecast
#[derive(Debug, Clone)]
pub struct FittedArima {
    ar_coefficients: Vec<f64>,
    /// Mean squared one-step residual on the differenced scale
    sigma2: f64,
    /// Last `p` values of the differenced series, oldest first
    history: Vec<f64>,
    /// Last value of the series at each differencing level, level 0 first
    tails: Vec<f64>,
    n_obs: usize,
}

impl Arima {
    /// Create a new ARIMA specification.
    ///
    /// Only pure autoregressive models are supported, so `q` must be zero.
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p == 0 {
            return Err(MathError::InvalidInput(
                "AR order must be at least 1".to_string(),
            ));
        }
        if q != 0 {
            return Err(MathError::InvalidInput(format!(
                "MA order {} is not supported, only ARIMA(p, d, 0) models can be fitted",
                q
            )));
        }

        Ok(Self { p, d, q })
    }

    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Smallest series length the model can be fitted on: `d` values are
    /// consumed by differencing, `p` by the lags, and at least `p` equations
    /// are needed for the `p` unknowns.
    pub fn min_observations(&self) -> usize {
        self.d + 2 * self.p
    }

    /// Fit the model to `values`
    pub fn fit(&self, values: &[f64]) -> Result<FittedArima> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Series contains non-finite values".to_string(),
            ));
        }
        if values.len() < self.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "ARIMA({},{},{}) needs at least {} observations, have {}",
                self.p,
                self.d,
                self.q,
                self.min_observations(),
                values.len()
            )));
        }

        let mut tails = Vec::with_capacity(self.d);
        let mut level = values.to_vec();
        for _ in 0..self.d {
            if let Some(&last) = level.last() {
                tails.push(last);
            }
            level = difference(&level, 1);
        }

        let ar_coefficients = conditional_least_squares(&level, self.p)?;
        if ar_coefficients.iter().any(|c| !c.is_finite()) {
            return Err(MathError::CalculationError(
                "AR coefficients are not finite".to_string(),
            ));
        }

        let residuals: Vec<f64> = (self.p..level.len())
            .map(|t| level[t] - predict_next(&level[..t], &ar_coefficients))
            .collect();
        let sigma2 = residuals.iter().map(|r| r * r).mean();

        let history = level[level.len() - self.p..].to_vec();

        Ok(FittedArima {
            ar_coefficients,
            sigma2,
            history,
            tails,
            n_obs: values.len(),
        })
    }
}

impl FittedArima {
    /// Forecast `horizon` steps beyond the end of the fitted series
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut history = self.history.clone();
        let mut series = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let next = predict_next(&history, &self.ar_coefficients);
            history.push(next);
            series.push(next);
        }

        for &tail in self.tails.iter().rev() {
            let mut acc = tail;
            series = series
                .into_iter()
                .map(|diff| {
                    acc += diff;
                    acc
                })
                .collect();
        }

        if series.iter().any(|v| !v.is_finite()) {
            return Err(MathError::CalculationError(
                "Forecast diverged to non-finite values".to_string(),
            ));
        }

        Ok(series)
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Number of observations the model was fitted on
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }
}

/// One-step prediction from the tail of `history`
fn predict_next(history: &[f64], coefficients: &[f64]) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(lag, phi)| phi * history[history.len() - 1 - lag])
        .sum()
}

/// Least-squares AR(p) coefficients for `y`, conditioning on the first `p` values
fn conditional_least_squares(y: &[f64], p: usize) -> Result<Vec<f64>> {
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];

    for t in p..y.len() {
        for i in 0..p {
            let xi = y[t - 1 - i];
            xty[i] += xi * y[t];
            for j in 0..p {
                xtx[i][j] += xi * y[t - 1 - j];
            }
        }
    }

    solve_linear_system(xtx, xty)
}

/// Gaussian elimination with partial pivoting.
///
/// Columns left without a usable pivot are free and solved as 0.
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    let scale = (0..n).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    if !scale.is_finite() || b.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "normal equations are not finite".to_string(),
        ));
    }
    let tolerance = scale * PIVOT_TOLERANCE;

    // (row, column) of each pivot, in elimination order
    let mut pivots = Vec::with_capacity(n);
    for col in 0..n {
        let row = pivots.len();
        if row == n {
            break;
        }

        let pivot_row = (row..n)
            .max_by(|&r1, &r2| {
                a[r1][col]
                    .abs()
                    .partial_cmp(&a[r2][col].abs())
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(row);

        if a[pivot_row][col].abs() <= tolerance {
            continue;
        }

        a.swap(row, pivot_row);
        b.swap(row, pivot_row);

        let pivot = a[row].clone();
        for r in row + 1..n {
            let factor = a[r][col] / pivot[col];
            for k in col..n {
                a[r][k] -= factor * pivot[k];
            }
            b[r] -= factor * b[row];
        }
        pivots.push((row, col));
    }

    let mut x = vec![0.0; n];
    for &(row, col) in pivots.iter().rev() {
        let tail: f64 = (col + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[col] = (b[row] - tail) / a[row][col];
    }

    Ok(x)
}
