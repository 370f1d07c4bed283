//! Report pipeline and text views
//!
//! [`render`] is the single pure pass behind every dashboard interaction:
//! filter, split by product, resample, moving average, forecast. It owns no
//! state; callers rebuild the criteria and call it again on every change.

use crate::config::ForecastSettings;
use crate::data::{SalesRecord, DATE_COLUMN, DATE_FORMAT, PRODUCT_COLUMN, QUANTITY_COLUMN};
use crate::error::Result;
use crate::filter::{filter, FilterCriteria};
use crate::models::{self, ForecastOutcome, MovingAverage, MovingAverageSeries};
use crate::resample::{resample_daily, split_by_product, DailySeries};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Everything drawn for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub product: String,
    pub actual: DailySeries,
    pub moving_average: MovingAverageSeries,
    pub forecast: ForecastOutcome,
}

/// Output of one report pass, in a renderer-neutral schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub criteria: FilterCriteria,
    pub window: usize,
    /// Filtered table, verbatim and in input order
    pub table: Vec<SalesRecord>,
    pub products: Vec<ProductReport>,
}

impl RenderModel {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn forecast_count(&self) -> usize {
        self.products
            .iter()
            .filter(|p| p.forecast.is_available())
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run one full report pass over `records`
pub fn render(
    records: &[SalesRecord],
    criteria: &FilterCriteria,
    window: usize,
    settings: &ForecastSettings,
) -> Result<RenderModel> {
    let averager = MovingAverage::new(window)?;
    let table = filter(records, criteria);

    let mut products = Vec::with_capacity(criteria.selected_products.len());
    for (product, rows) in split_by_product(&table, &criteria.selected_products) {
        let actual = resample_daily(&rows);
        let moving_average = averager.apply(&actual)?;
        let forecast = models::forecast(&actual, &moving_average, settings);

        tracing::debug!(
            product = %product,
            days = actual.len(),
            trimmed = moving_average.defined_count(),
            forecast = forecast.is_available(),
            "product series ready"
        );

        products.push(ProductReport {
            product,
            actual,
            moving_average,
            forecast,
        });
    }

    let model = RenderModel {
        criteria: criteria.clone(),
        window,
        table,
        products,
    };
    tracing::info!(
        rows = model.table.len(),
        products = model.products.len(),
        forecasts = model.forecast_count(),
        window,
        "report rendered"
    );
    Ok(model)
}

/// Filtered table as a Markdown table
pub fn table_view(records: &[SalesRecord]) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "| {} | {} | {} |",
        DATE_COLUMN, PRODUCT_COLUMN, QUANTITY_COLUMN
    );
    let _ = writeln!(output, "|---|---|---:|");
    for record in records {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            record.date.format(DATE_FORMAT),
            record.product_name,
            record.quantity
        );
    }

    if records.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "No records match the current filter.");
    }

    output
}

/// Per-product summary of the series and forecast status
pub fn summary_view(model: &RenderModel) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Sales Report");
    let _ = writeln!(
        output,
        "Filtered {} to {}, moving average window {} days",
        model.criteria.start_date, model.criteria.end_date, model.window
    );
    let _ = writeln!(output);

    if model.products.is_empty() {
        let _ = writeln!(output, "No products selected.");
        return output;
    }

    for report in &model.products {
        let _ = writeln!(output, "## {}", report.product);

        if report.actual.is_empty() {
            let _ = writeln!(output, "- no sales in range");
            let _ = writeln!(output);
            continue;
        }

        let _ = writeln!(
            output,
            "- actual: {} days, {} sold",
            report.actual.len(),
            report.actual.total()
        );
        match report.moving_average.last_value() {
            Some(value) => {
                let _ = writeln!(output, "- moving average: latest {:.2}", value);
            }
            None => {
                let _ = writeln!(output, "- moving average: window not yet filled");
            }
        }
        match &report.forecast {
            ForecastOutcome::Available(forecast) => {
                let values = forecast.values();
                let _ = writeln!(
                    output,
                    "- {} forecast: {} days from {} ({:.2} -> {:.2})",
                    forecast.model,
                    forecast.len(),
                    forecast
                        .first_date()
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    values.first().copied().unwrap_or_default(),
                    values.last().copied().unwrap_or_default()
                );
            }
            ForecastOutcome::NotAvailable(reason) => {
                let _ = writeln!(output, "- forecast not available: {}", reason);
            }
        }
        let _ = writeln!(output);
    }

    output
}
