//! Error types for the sales_report crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while loading, rendering or exporting a sales report
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input file is missing a required column or holds malformed values
    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    MathError(#[from] sales_math::MathError),

    /// The configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// The chart could not be drawn
    #[error("Chart error: {0}")]
    Chart(String),

    /// The spreadsheet could not be written
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<PolarsError> for ReportError {
    fn from(err: PolarsError) -> Self {
        ReportError::PolarsError(err.to_string())
    }
}

impl From<toml::de::Error> for ReportError {
    fn from(err: toml::de::Error) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl From<calamine::XlsxError> for ReportError {
    fn from(err: calamine::XlsxError) -> Self {
        match err {
            calamine::XlsxError::Io(e) => ReportError::IoError(e),
            other => ReportError::InvalidInput(other.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Spreadsheet(err.to_string())
    }
}
