//! # Sales Report
//!
//! Loading, filtering and forecasting of daily sales, plus the views and
//! exports a sales dashboard needs.
//!
//! ## Features
//!
//! - CSV or xlsx sales tables with `tanggal`, `nama_produk` and `jumlah` columns
//! - Inclusive date-range and product filtering
//! - Per-product daily resampling with zero-filled gaps
//! - Moving averages (window 3 to 14 days) and 30-day ARIMA(5,1,0) forecasts
//! - Text table and summary views, JSON render model, SVG chart
//! - Spreadsheet (xlsx) and document (SVG) export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_report::config::ForecastSettings;
//! use sales_report::data::SalesLoader;
//! use sales_report::filter::FilterCriteria;
//! use sales_report::render::{render, summary_view};
//!
//! let store = SalesLoader::from_path("data_penjualan_3bulan.csv")?;
//! let criteria = FilterCriteria::for_store(&store);
//! let model = render(store.records(), &criteria, 7, &ForecastSettings::default())?;
//! println!("{}", summary_view(&model));
//! # Ok::<(), sales_report::ReportError>(())
//! ```

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod render;
pub mod resample;

// Re-export commonly used types
pub use crate::config::{DashboardConfig, ForecastSettings};
pub use crate::data::{RecordStore, SalesLoader, SalesRecord};
pub use crate::error::ReportError;
pub use crate::export::ExportFormat;
pub use crate::filter::FilterCriteria;
pub use crate::models::{ForecastModel, ForecastOutcome, ForecastSeries};
pub use crate::render::{render, RenderModel};
pub use crate::resample::DailySeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
