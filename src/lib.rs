//! # Sales Dashboard
//!
//! Command-line front end over the sales workspace crates:
//!
//! - [`sales_math`]: rolling means and ARIMA fitting
//! - [`sales_report`]: loading, filtering, forecasting, views and export
//!
//! ## Example
//!
//! ```
//! use sales_dashboard::sales_report::models::DEFAULT_WINDOW;
//!
//! assert_eq!(DEFAULT_WINDOW, 7);
//! ```

pub mod cli;

pub use sales_math;
pub use sales_report;
