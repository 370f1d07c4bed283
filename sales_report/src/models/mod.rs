//! Forecast engine
//!
//! Moving averages and ARIMA forecasts over per-product daily series. The
//! [`forecast`] entry point never fails: insufficient history and fitting
//! problems both come back as [`ForecastOutcome::NotAvailable`] so one bad
//! product cannot abort a whole report.

use crate::config::ForecastSettings;
use crate::error::Result;
use crate::resample::DailySeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

pub mod arima;
pub mod moving_average;

pub use arima::{ArimaForecaster, TrainedArimaForecaster};
pub use moving_average::{moving_average, MovingAverage, MovingAveragePoint, MovingAverageSeries};

/// Default moving-average window in days
pub const DEFAULT_WINDOW: usize = 7;
/// Smallest accepted moving-average window
pub const MIN_WINDOW: usize = 3;
/// Largest accepted moving-average window
pub const MAX_WINDOW: usize = 14;
/// Days projected past the last observation
pub const FORECAST_HORIZON: usize = 30;
/// A forecast needs strictly more defined moving-average points than this
pub const MIN_TRIMMED_OBSERVATIONS: usize = 10;
/// ARIMA (p, d, q) order used for sales forecasts
pub const ARIMA_ORDER: (usize, usize, usize) = (5, 1, 0);

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Consecutive forecast days following the last observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Name of the model that produced the forecast
    pub model: String,
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Lay `values` out on the days after `last_observed`
    pub fn following(model: impl Into<String>, last_observed: NaiveDate, values: Vec<f64>) -> Self {
        let points = last_observed
            .iter_days()
            .skip(1)
            .zip(values)
            .map(|(date, value)| ForecastPoint { date, value })
            .collect();

        Self {
            model: model.into(),
            points,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Why a product has no forecast line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotAvailableReason {
    /// Too few defined moving-average points
    InsufficientHistory { observations: usize, required: usize },
    /// The model could not be fitted or diverged
    FitFailed { message: String },
}

impl fmt::Display for NotAvailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotAvailableReason::InsufficientHistory {
                observations,
                required,
            } => write!(
                f,
                "insufficient history ({} observations, need {})",
                observations, required
            ),
            NotAvailableReason::FitFailed { message } => write!(f, "model fit failed: {}", message),
        }
    }
}

/// Result of the forecast step for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Available(ForecastSeries),
    NotAvailable(NotAvailableReason),
}

impl ForecastOutcome {
    pub fn series(&self) -> Option<&ForecastSeries> {
        match self {
            ForecastOutcome::Available(series) => Some(series),
            ForecastOutcome::NotAvailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ForecastOutcome::Available(_))
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate a forecast for the days after the training series
    fn forecast(&self, horizon: usize) -> Result<ForecastSeries>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a daily series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a daily series
    fn train(&self, series: &DailySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Forecast `series` if its moving average has enough defined points.
///
/// Eligibility is measured on the moving average, so a wider window needs a
/// longer raw series before a forecast appears. The model itself is fitted on
/// the raw daily quantities.
pub fn forecast(
    series: &DailySeries,
    moving_average: &MovingAverageSeries,
    settings: &ForecastSettings,
) -> ForecastOutcome {
    let observations = moving_average.defined_count();
    if observations <= settings.min_observations {
        return ForecastOutcome::NotAvailable(NotAvailableReason::InsufficientHistory {
            observations,
            required: settings.min_observations + 1,
        });
    }

    let (p, d, q) = settings.order;
    let result = ArimaForecaster::new(p, d, q)
        .and_then(|model| model.train(series))
        .and_then(|trained| trained.forecast(settings.horizon));

    match result {
        Ok(forecast) => ForecastOutcome::Available(forecast),
        Err(e) => {
            tracing::warn!(error = %e, observations, "forecast not available");
            ForecastOutcome::NotAvailable(NotAvailableReason::FitFailed {
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SalesRecord;
    use crate::resample::resample_daily;

    fn series_of(quantities: &[f64]) -> DailySeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records: Vec<SalesRecord> = start
            .iter_days()
            .zip(quantities)
            .map(|(date, &q)| SalesRecord::new(date, "Kopi", q))
            .collect();
        resample_daily(&records)
    }

    fn noisy(n: usize) -> Vec<f64> {
        let mut state: u64 = 7;
        (0..n)
            .map(|_| {
                state = (state * 1_103_515_245 + 12_345) % (1 << 31);
                ((state >> 16) % 40) as f64 + 10.0
            })
            .collect()
    }

    #[test]
    fn test_following_dates_are_consecutive() {
        let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let forecast = ForecastSeries::following("ARIMA(5,1,0)", last, vec![1.0, 2.0, 3.0]);

        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast.first_date(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(forecast.last_date(), NaiveDate::from_ymd_opt(2024, 2, 3));
    }

    #[test]
    fn test_fifteen_days_window_seven_is_not_eligible() {
        let series = series_of(&[10.0; 15]);
        let ma = moving_average(&series, 7).unwrap();
        let outcome = forecast(&series, &ma, &ForecastSettings::default());

        assert_eq!(
            outcome,
            ForecastOutcome::NotAvailable(NotAvailableReason::InsufficientHistory {
                observations: 9,
                required: 11,
            })
        );
    }

    #[test]
    fn test_twenty_days_window_seven_forecasts_thirty_days() {
        let series = series_of(&noisy(20));
        let ma = moving_average(&series, 7).unwrap();
        assert_eq!(ma.defined_count(), 14);

        let outcome = forecast(&series, &ma, &ForecastSettings::default());
        let forecast = outcome.series().expect("forecast should be available");
        assert_eq!(forecast.len(), 30);
        assert_eq!(
            forecast.first_date(),
            series.last_date().and_then(|d| d.succ_opt())
        );
    }

    #[test]
    fn test_constant_series_forecasts_flat_line() {
        let series = series_of(&[10.0; 20]);
        let ma = moving_average(&series, 7).unwrap();
        let outcome = forecast(&series, &ma, &ForecastSettings::default());

        let forecast = outcome.series().expect("constant series should forecast");
        assert_eq!(forecast.values(), vec![10.0; 30]);
    }

    #[test]
    fn test_fit_error_downgrades_to_fit_failed() {
        // ARIMA(8,1,0) needs 17 days; 14 days still pass the gate at window 3
        let series = series_of(&noisy(14));
        let ma = moving_average(&series, 3).unwrap();
        let settings = ForecastSettings {
            order: (8, 1, 0),
            ..ForecastSettings::default()
        };

        assert!(matches!(
            forecast(&series, &ma, &settings),
            ForecastOutcome::NotAvailable(NotAvailableReason::FitFailed { .. })
        ));
    }

    #[test]
    fn test_reason_display() {
        let reason = NotAvailableReason::InsufficientHistory {
            observations: 4,
            required: 11,
        };
        assert_eq!(reason.to_string(), "insufficient history (4 observations, need 11)");
    }
}
