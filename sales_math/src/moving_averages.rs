//! Moving average calculation
//!
//! A streaming Simple Moving Average plus a batch helper that lays the
//! streaming values out against the input, leaving `None` wherever the window
//! is not yet full.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new value, dropping the oldest one once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Whether a full window has been seen
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.period
    }

}

/// Rolling mean over `values` with the given window.
///
/// The output has the same length as the input. Position `i` holds the mean of
/// `values[i + 1 - window..=i]`, or `None` for the first `window - 1` positions.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;
    let mut out = Vec::with_capacity(values.len());

    for &value in values {
        sma.update(value);
        out.push(if sma.is_ready() { Some(sma.value()?) } else { None });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_err());

        sma.update(2.0);
        sma.update(4.0);
        assert!(!sma.is_ready());
        sma.update(6.0);

        assert!((sma.value().unwrap() - 4.0).abs() < 0.001);

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert!((sma.value().unwrap() - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_sma_rejects_zero_period() {
        assert!(SimpleMovingAverage::new(0).is_err());
        assert!(rolling_mean(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_rolling_mean_leading_gaps() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ma = rolling_mean(&values, 3).unwrap();

        assert_eq!(ma.len(), values.len());
        assert_eq!(&ma[..2], &[None, None]);
        assert_eq!(ma[2], Some(2.0));
        assert_eq!(ma[3], Some(3.0));
        assert_eq!(ma[4], Some(4.0));
    }

    #[test]
    fn test_rolling_mean_shorter_than_window() {
        let ma = rolling_mean(&[5.0, 5.0], 7).unwrap();
        assert_eq!(ma, vec![None, None]);

        assert!(rolling_mean(&[], 3).unwrap().is_empty());
    }
}
