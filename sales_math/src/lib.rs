//! # Sales Math
//!
//! Numeric kernels behind the sales dashboard: rolling moving averages and
//! autoregressive integrated forecasting. Nothing in this crate knows about
//! dates, products or files; it works on plain `f64` slices.

use thiserror::Error;

pub mod forecasting;
pub mod moving_averages;

pub use forecasting::{difference, Arima, FittedArima};
pub use moving_averages::{rolling_mean, SimpleMovingAverage};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
