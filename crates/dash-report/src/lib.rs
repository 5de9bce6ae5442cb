//! HTML dashboard renderer for Matiks user behavior and revenue reports.
//!
//! Generates a self-contained HTML dashboard from precomputed section data.
//! The crate knows nothing about CSV loading or aggregation; callers build
//! the sections and hand them over as [`ReportData`].
//!
//! # Sections
//!
//! - Overview: row counts, applied filters, DAU/WAU/MAU tiles
//! - Activity: daily, weekly and monthly active user series
//! - Revenue: monthly trend, revenue by device type, average by game mode
//! - Churn: users inactive past the churn window
//! - Top users: highest revenue users
//! - Cohorts: average revenue by signup month
//! - Export: filtered CSV embedded as a download link
//!
//! # Example
//!
//! ```no_run
//! use dash_report::{ReportConfig, ReportData, ReportGenerator};
//!
//! let generator = ReportGenerator::new(ReportConfig::default());
//! let data = ReportData::empty(ReportConfig::default());
//! let html = generator.generate(data).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod sections;

pub use config::{CdnLibrary, ReportConfig, ReportSections, ReportTheme};
pub use error::{ReportError, Result};
pub use generator::{ReportData, ReportGenerator};
