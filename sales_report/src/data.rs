//! Sales record loading and the in-memory record store

use crate::error::{ReportError, Result};
use calamine::{open_workbook, Data, DataType as _, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Column holding the sale date
pub const DATE_COLUMN: &str = "tanggal";
/// Column holding the product name
pub const PRODUCT_COLUMN: &str = "nama_produk";
/// Column holding the quantity sold
pub const QUANTITY_COLUMN: &str = "jumlah";

/// Date format used for reading and writing the date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the sales table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product_name: String,
    pub quantity: f64,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, product_name: impl Into<String>, quantity: f64) -> Self {
        Self {
            date,
            product_name: product_name.into(),
            quantity,
        }
    }
}

/// Read-only table of sales records, loaded once per session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<SalesRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct product names in first-seen order
    pub fn products(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.product_name) {
                seen.push(record.product_name.clone());
            }
        }
        seen
    }

    /// Earliest and latest sale date, or `None` for an empty store
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

/// Loader for sales tables
#[derive(Debug)]
pub struct SalesLoader;

impl SalesLoader {
    /// Load a sales table, choosing the reader from the file extension:
    /// `.xlsx` workbooks go through [`SalesLoader::from_xlsx`], anything else
    /// is read as CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RecordStore> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx") => Self::from_xlsx(path),
            _ => Self::from_csv(path),
        }
    }

    /// Load sales records from a CSV file with a header row.
    ///
    /// Every column is read as text so product codes such as `007` keep their
    /// leading zeros; quantities are parsed afterwards.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RecordStore> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(Some(0))
            .has_header(true)
            .finish()
            .map_err(|e| ReportError::InvalidInput(format!("{}: {}", path.display(), e)))?;

        let store = Self::from_dataframe(&df)?;
        tracing::info!(
            path = %path.display(),
            records = store.len(),
            "loaded sales records"
        );
        Ok(store)
    }

    /// Load sales records from the first worksheet of an `.xlsx` workbook.
    /// The first row holds the column names.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<RecordStore> {
        let path = path.as_ref();
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let range = workbook.worksheet_range_at(0).ok_or_else(|| {
            ReportError::InvalidInput(format!("{}: workbook has no worksheets", path.display()))
        })??;

        let store = Self::from_dataframe(&sheet_to_dataframe(&range)?)?;
        tracing::info!(
            path = %path.display(),
            records = store.len(),
            "loaded sales records from workbook"
        );
        Ok(store)
    }

    /// Build a record store from a DataFrame holding the required columns.
    ///
    /// Fails on the first missing column, unparsable date or missing quantity;
    /// no partial store is returned.
    pub fn from_dataframe(df: &DataFrame) -> Result<RecordStore> {
        let dates = Self::string_column(df, DATE_COLUMN)?;
        let products = Self::string_column(df, PRODUCT_COLUMN)?;
        let quantities = Self::float_column(df, QUANTITY_COLUMN)?;

        let mut records = Vec::with_capacity(df.height());
        for (row, ((date, product), quantity)) in dates
            .into_iter()
            .zip(products)
            .zip(quantities)
            .enumerate()
        {
            let date = date
                .as_deref()
                .and_then(parse_date)
                .ok_or_else(|| invalid_cell(DATE_COLUMN, row))?;
            let product_name = product.ok_or_else(|| invalid_cell(PRODUCT_COLUMN, row))?;
            let quantity = quantity
                .filter(|q| q.is_finite())
                .ok_or_else(|| invalid_cell(QUANTITY_COLUMN, row))?;

            records.push(SalesRecord {
                date,
                product_name,
                quantity,
            });
        }

        Ok(RecordStore::new(records))
    }

    fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        df.column(name).map_err(|_| {
            ReportError::InvalidInput(format!("missing required column '{}'", name))
        })
    }

    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        let series = Self::required_column(df, name)?.cast(&DataType::Utf8)?;
        let values = series
            .utf8()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect();
        Ok(values)
    }

    fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
        let series = Self::required_column(df, name)?;
        let numeric: Vec<Option<f64>> = match series.dtype() {
            DataType::Utf8 => series
                .utf8()?
                .into_iter()
                .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
                .collect(),
            _ => series
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect(),
        };
        Ok(numeric)
    }
}

/// Worksheet cells as text columns named by the header row
fn sheet_to_dataframe(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::default());
    };

    let names: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(range.height()); names.len()];
    for row in rows {
        for (column, cell) in columns.iter_mut().zip(row) {
            column.push(cell_text(cell));
        }
    }

    let series: Vec<Series> = names
        .iter()
        .zip(columns)
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, values)| Series::new(name.as_str(), values))
        .collect();
    Ok(DataFrame::new(series)?)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => {
            cell.as_date().map(|d| d.format(DATE_FORMAT).to_string())
        }
        other => Some(other.to_string()),
    }
}

fn invalid_cell(column: &str, row: usize) -> ReportError {
    ReportError::InvalidInput(format!(
        "malformed or missing value in column '{}' at row {}",
        column,
        row + 1
    ))
}

/// Parse a calendar date, accepting an optional time part which is dropped
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
