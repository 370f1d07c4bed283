//! Report export
//!
//! The filtered table goes out as an `.xlsx` workbook with the input column
//! layout, so it can be loaded again, and the chart as an SVG document. Empty
//! inputs still produce well-formed files.

use crate::chart::render_svg;
use crate::config::ExportSettings;
use crate::data::{SalesRecord, DATE_COLUMN, PRODUCT_COLUMN, QUANTITY_COLUMN};
use crate::error::{ReportError, Result};
use crate::render::RenderModel;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Worksheet holding the exported table
pub const SHEET_NAME: &str = "Data Penjualan";

/// Export target chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Filtered table as a spreadsheet
    Spreadsheet,
    /// Current chart as a document
    Document,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Document => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Document => "image/svg+xml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            "svg" | "chart" | "document" => Ok(ExportFormat::Document),
            other => Err(ReportError::InvalidParameter(format!(
                "unknown export format '{}', expected xlsx or svg",
                other
            ))),
        }
    }
}

/// Write the filtered table to `path` as an `.xlsx` workbook
pub fn export_spreadsheet(records: &[SalesRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, name) in (0u16..).zip([DATE_COLUMN, PRODUCT_COLUMN, QUANTITY_COLUMN]) {
        sheet.write_string_with_format(0, col, name, &header_format)?;
    }
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 24)?;

    for (row, record) in (1u32..).zip(records) {
        sheet.write_datetime_with_format(row, 0, &record.date, &date_format)?;
        sheet.write_string(row, 1, record.product_name.as_str())?;
        sheet.write_number(row, 2, record.quantity)?;
    }
    workbook.save(path)?;

    tracing::info!(path = %path.display(), rows = records.len(), "spreadsheet exported");
    Ok(())
}

/// Write the chart for `model` to `path` as SVG
pub fn export_document(model: &RenderModel, path: &Path) -> Result<()> {
    fs::write(path, render_svg(model)?)?;

    tracing::info!(path = %path.display(), products = model.products.len(), "chart exported");
    Ok(())
}

/// Export in `format` under the configured directory and return the written path
pub fn export(format: ExportFormat, model: &RenderModel, settings: &ExportSettings) -> Result<PathBuf> {
    fs::create_dir_all(&settings.out_dir)?;
    let path = settings
        .out_dir
        .join(format!("{}.{}", settings.file_stem, format.extension()));

    match format {
        ExportFormat::Spreadsheet => export_spreadsheet(&model.table, &path)?,
        ExportFormat::Document => export_document(model, &path)?,
    }

    Ok(path)
}
