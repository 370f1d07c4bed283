//! Date-range and product filtering

use crate::data::{RecordStore, SalesRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter applied to the record store for one report pass.
///
/// The date range is inclusive on both ends. An empty product set selects
/// nothing; there is no implicit "all products" fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub selected_products: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new<I, S>(start_date: NaiveDate, end_date: NaiveDate, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_date,
            end_date,
            selected_products: products.into_iter().map(Into::into).collect(),
        }
    }

    /// Dashboard defaults: the store's full date span with every product selected.
    /// An empty store gets an unbounded range and no products.
    pub fn for_store(store: &RecordStore) -> Self {
        let (start_date, end_date) = store
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self::new(start_date, end_date, store.products())
    }

    /// Replace the date range, keeping the current bound where `None` is given
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        if let Some(start) = start {
            self.start_date = start;
        }
        if let Some(end) = end {
            self.end_date = end;
        }
        self
    }

    /// Replace the product selection
    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the range is inverted and therefore selects nothing
    pub fn is_empty_range(&self) -> bool {
        self.start_date > self.end_date
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        record.date >= self.start_date
            && record.date <= self.end_date
            && self.selected_products.contains(&record.product_name)
    }
}

/// Records matching `criteria`, in input order
pub fn filter(records: &[SalesRecord], criteria: &FilterCriteria) -> Vec<SalesRecord> {
    if criteria.is_empty_range() || criteria.selected_products.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            SalesRecord::new(day(3), "Kopi", 1.0),
            SalesRecord::new(day(1), "Teh", 2.0),
            SalesRecord::new(day(5), "Kopi", 3.0),
            SalesRecord::new(day(8), "Susu", 4.0),
        ]
    }

    #[test]
    fn test_filter_keeps_order_and_bounds() {
        let criteria = FilterCriteria::new(day(1), day(5), ["Kopi", "Teh"]);
        let result = filter(&sample(), &criteria);

        let dates: Vec<NaiveDate> = result.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(1), day(5)]);
    }

    #[test]
    fn test_empty_product_set_selects_nothing() {
        let criteria = FilterCriteria::new(day(1), day(31), Vec::<String>::new());
        assert!(filter(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let criteria = FilterCriteria::new(day(9), day(1), ["Kopi"]);
        assert!(criteria.is_empty_range());
        assert!(filter(&sample(), &criteria).is_empty());
    }

    #[test]
    fn test_for_store_selects_everything() {
        let store = RecordStore::new(sample());
        let criteria = FilterCriteria::for_store(&store);

        assert_eq!(criteria.start_date, day(1));
        assert_eq!(criteria.end_date, day(8));
        assert_eq!(filter(store.records(), &criteria).len(), 4);
    }

    #[test]
    fn test_with_range_keeps_unspecified_bound() {
        let criteria = FilterCriteria::new(day(1), day(8), ["Kopi"]).with_range(Some(day(4)), None);
        assert_eq!(criteria.start_date, day(4));
        assert_eq!(criteria.end_date, day(8));
        assert_eq!(filter(&sample(), &criteria).len(), 1);
    }
}
