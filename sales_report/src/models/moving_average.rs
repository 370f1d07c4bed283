//! Moving average over daily sales

use crate::config::validate_window;
use crate::error::Result;
use crate::resample::DailySeries;
use chrono::NaiveDate;
use sales_math::rolling_mean;
use serde::{Deserialize, Serialize};

/// Moving average value for one day; `None` until the window is full
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Moving average aligned day-for-day with its daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    points: Vec<MovingAveragePoint>,
}

impl MovingAverageSeries {
    pub fn points(&self) -> &[MovingAveragePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of days with a defined value (the trimmed series length)
    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// Number of leading days without a value
    pub fn leading_undefined(&self) -> usize {
        self.points.iter().take_while(|p| p.value.is_none()).count()
    }

    /// Defined values only, with their dates
    pub fn trimmed(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
            .collect()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().and_then(|p| p.value)
    }
}

/// Simple moving average with a validated window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    /// Create a moving average; the window must lie in 3..=14
    pub fn new(window: usize) -> Result<Self> {
        validate_window(window)?;
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn apply(&self, series: &DailySeries) -> Result<MovingAverageSeries> {
        let values = rolling_mean(&series.quantities(), self.window)?;
        let points = series
            .points()
            .iter()
            .zip(values)
            .map(|(point, value)| MovingAveragePoint {
                date: point.date,
                value,
            })
            .collect();

        Ok(MovingAverageSeries {
            window: self.window,
            points,
        })
    }
}

/// Moving average of `series` over `window` days
pub fn moving_average(series: &DailySeries, window: usize) -> Result<MovingAverageSeries> {
    MovingAverage::new(window)?.apply(series)
}
