//! ARIMA models for daily sales forecasting

use crate::error::{ReportError, Result};
use crate::models::{ForecastModel, ForecastSeries, TrainedForecastModel};
use crate::resample::DailySeries;
use chrono::NaiveDate;
use sales_math::{Arima, FittedArima};

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaForecaster {
    /// Name of the model
    name: String,
    arima: Arima,
}

/// ARIMA model fitted to one product's daily series
#[derive(Debug, Clone)]
pub struct TrainedArimaForecaster {
    /// Name of the model
    name: String,
    fitted: FittedArima,
    /// Last day of the training series
    last_date: NaiveDate,
}

impl ArimaForecaster {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        let arima = Arima::new(p, d, q)?;
        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            arima,
        })
    }

    pub fn order(&self) -> (usize, usize, usize) {
        self.arima.order()
    }
}

impl ForecastModel for ArimaForecaster {
    type Trained = TrainedArimaForecaster;

    fn train(&self, series: &DailySeries) -> Result<TrainedArimaForecaster> {
        let last_date = series.last_date().ok_or_else(|| {
            ReportError::ForecastingError("Cannot fit a model to an empty series".to_string())
        })?;

        let fitted = self.arima.fit(&series.quantities())?;
        tracing::debug!(
            model = %self.name,
            n_obs = fitted.n_obs(),
            sigma2 = fitted.sigma2(),
            coefficients = ?fitted.ar_coefficients(),
            "fitted ARIMA model"
        );

        Ok(TrainedArimaForecaster {
            name: self.name.clone(),
            fitted,
            last_date,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArimaForecaster {
    fn forecast(&self, horizon: usize) -> Result<ForecastSeries> {
        let values = self.fitted.forecast(horizon)?;
        Ok(ForecastSeries::following(&self.name, self.last_date, values))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
