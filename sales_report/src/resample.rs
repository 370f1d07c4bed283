//! Per-product daily resampling
//!
//! Raw records are summed per calendar day and every day between the first
//! and last sale is materialised, with zero for days without sales.

use crate::data::SalesRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Quantity sold on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// Contiguous, strictly increasing daily series for one product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.quantity).sum()
    }
}

/// Resample one product's records into one entry per calendar day
pub fn resample_daily(records: &[SalesRecord]) -> DailySeries {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.date).or_insert(0.0) += record.quantity;
    }

    let (Some((&first, _)), Some((&last, _))) = (totals.first_key_value(), totals.last_key_value())
    else {
        return DailySeries::default();
    };

    let points = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| DailyPoint {
            date,
            quantity: totals.get(&date).copied().unwrap_or(0.0),
        })
        .collect();

    DailySeries { points }
}

/// Group records by product, one group per selected product in sorted order.
///
/// Selected products without matching rows get an empty group.
pub fn split_by_product(
    records: &[SalesRecord],
    products: &BTreeSet<String>,
) -> Vec<(String, Vec<SalesRecord>)> {
    let mut groups: BTreeMap<&str, Vec<SalesRecord>> =
        products.iter().map(|p| (p.as_str(), Vec::new())).collect();

    for record in records {
        if let Some(group) = groups.get_mut(record.product_name.as_str()) {
            group.push(record.clone());
        }
    }

    groups
        .into_iter()
        .map(|(product, rows)| (product.to_string(), rows))
        .collect()
}
