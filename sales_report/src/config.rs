//! Dashboard configuration
//!
//! Parsed from an optional TOML file. Every field has a default, so an empty
//! file (or no file at all) reproduces the stock dashboard:
//!
//! ```toml
//! input = "data_penjualan_3bulan.csv"
//! window = 7
//!
//! [forecast]
//! horizon = 30
//! min_observations = 10
//! order = [5, 1, 0]
//!
//! [export]
//! out_dir = "."
//! file_stem = "laporan_penjualan"
//! ```

use crate::error::{ReportError, Result};
use crate::models::{
    ARIMA_ORDER, DEFAULT_WINDOW, FORECAST_HORIZON, MAX_WINDOW, MIN_TRIMMED_OBSERVATIONS,
    MIN_WINDOW,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sales table to load
    pub input: PathBuf,
    /// Moving-average window in days
    pub window: usize,
    pub forecast: ForecastSettings,
    pub export: ExportSettings,
}

/// Forecast engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Number of days projected past the last observation
    pub horizon: usize,
    /// A forecast needs strictly more defined moving-average points than this
    pub min_observations: usize,
    /// ARIMA (p, d, q) order
    pub order: (usize, usize, usize),
}

/// Export destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub out_dir: PathBuf,
    /// File name without extension
    pub file_stem: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data_penjualan_3bulan.csv"),
            window: DEFAULT_WINDOW,
            forecast: ForecastSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon: FORECAST_HORIZON,
            min_observations: MIN_TRIMMED_OBSERVATIONS,
            order: ARIMA_ORDER,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            file_stem: "laporan_penjualan".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        validate_window(self.window)?;
        if self.forecast.horizon == 0 {
            return Err(ReportError::Config(
                "forecast.horizon must be at least 1".to_string(),
            ));
        }
        if self.export.file_stem.trim().is_empty() {
            return Err(ReportError::Config(
                "export.file_stem must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reject moving-average windows outside the supported range
pub fn validate_window(window: usize) -> Result<()> {
    if !(MIN_WINDOW..=MAX_WINDOW).contains(&window) {
        return Err(ReportError::InvalidParameter(format!(
            "window size must be between {} and {}, got {}",
            MIN_WINDOW, MAX_WINDOW, window
        )));
    }
    Ok(())
}
