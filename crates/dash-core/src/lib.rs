//! Matiks user behavior and revenue report generator.
//!
//! Loads the player dataset from CSV, applies equality-set filters, and
//! computes the dashboard's derived tables: active users, revenue trends and
//! segments, churn, top users, signup cohorts, and the filtered CSV export.
//!
//! # Example
//!
//! ```no_run
//! use dash_core::{DatasetCache, FilterCriteria, Granularity};
//! use dash_core::metrics::compute_active_users;
//!
//! let mut cache = DatasetCache::new();
//! let dataset = cache.get_or_load(std::path::Path::new("matiks.csv"))?;
//! let view = dataset.filter(&FilterCriteria::new().with_country(["US"]));
//! let dau = compute_active_users(&view, Granularity::Day);
//! # Ok::<(), dash_core::LoadError>(())
//! ```

pub mod cache;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod exit_codes;
pub mod export;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod period;
pub mod record;
pub mod summary;

pub use cache::DatasetCache;
pub use dashboard::Dashboard;
pub use dataset::{load, Dataset};
pub use error::{CoercionWarning, ComputationError, Error, LoadError, Result};
pub use export::{export_csv, write_csv};
pub use filter::{FilterCriteria, FilterOptions, View};
pub use period::{Granularity, Period};
pub use record::Record;
pub use summary::Summary;
