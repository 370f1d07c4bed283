//! Command-line surface of the dashboard.
//!
//! Every dashboard control maps to a flag here. Values given on the command
//! line win over the config file, which wins over the built-in defaults.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sales_report::config::{DashboardConfig, ExportSettings};
use sales_report::data::{parse_date, RecordStore};
use sales_report::error::Result;
use sales_report::export::ExportFormat;
use sales_report::filter::FilterCriteria;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sales-dashboard")]
#[command(about = "Daily sales with moving averages and 30-day ARIMA forecasts", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sales table (.csv or .xlsx) with tanggal, nama_produk and jumlah columns
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the filtered table and a per-product forecast summary
    Show {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the render model as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Write the filtered table or the chart to disk
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// xlsx (filtered table) or svg (chart)
        #[arg(long, default_value = "xlsx", value_parser = parse_format)]
        format: ExportFormat,
        /// Directory to write into
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List the products and the date span of the input
    Products,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// First day included (YYYY-MM-DD), defaults to the earliest sale
    #[arg(long, value_parser = parse_day)]
    pub start: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD), defaults to the latest sale
    #[arg(long, value_parser = parse_day)]
    pub end: Option<NaiveDate>,

    /// Product to include; repeat for several, defaults to all
    #[arg(long = "product")]
    pub products: Vec<String>,

    /// Select no products at all
    #[arg(long, conflicts_with = "products")]
    pub no_products: bool,

    /// Moving-average window in days (3 to 14)
    #[arg(long)]
    pub window: Option<usize>,
}

impl Cli {
    /// Load the config file if one was given and apply the global overrides
    pub fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        Ok(config)
    }
}

impl FilterArgs {
    pub fn window(&self, config: &DashboardConfig) -> usize {
        self.window.unwrap_or(config.window)
    }

    /// Build the filter for this pass, starting from the store's full span
    /// and every product
    pub fn criteria(&self, store: &RecordStore) -> FilterCriteria {
        let criteria = FilterCriteria::for_store(store).with_range(self.start, self.end);
        if self.no_products {
            criteria.with_products(Vec::<String>::new())
        } else if self.products.is_empty() {
            criteria
        } else {
            criteria.with_products(self.products.iter().cloned())
        }
    }
}

/// Export settings with the `--out-dir` override applied
pub fn export_settings(config: &DashboardConfig, out_dir: Option<PathBuf>) -> ExportSettings {
    let mut settings = config.export.clone();
    if let Some(dir) = out_dir {
        settings.out_dir = dir;
    }
    settings
}

fn parse_day(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{}' is not a date, expected YYYY-MM-DD", raw))
}

fn parse_format(raw: &str) -> std::result::Result<ExportFormat, String> {
    raw.parse::<ExportFormat>().map_err(|e| e.to_string())
}
