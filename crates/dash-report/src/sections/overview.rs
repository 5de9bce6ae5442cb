//! Overview section data.

use serde::{Deserialize, Serialize};

/// One active filter restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFilter {
    /// Column name as in the source header (e.g. "Country").
    pub field: String,
    /// Selected values.
    pub values: Vec<String>,
}

/// Overview section containing dataset and filter summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSection {
    /// Display name of the source file.
    pub source_name: String,
    /// SHA-256 of the source bytes.
    pub source_fingerprint: String,
    /// Rows in the loaded dataset.
    pub total_rows: usize,
    /// Rows left after filtering.
    pub filtered_rows: usize,
    /// Distinct non-null User_ID values in the filtered view.
    pub distinct_users: usize,
    /// Sum of revenue over the filtered view (None if not computable).
    pub total_revenue: Option<f64>,
    /// Timestamps that could not be parsed at load time.
    pub coercion_warnings: usize,
    /// Active filters (empty when unrestricted).
    pub filters: Vec<AppliedFilter>,

    // Metric tiles
    /// Days with at least one login.
    pub dau_days: usize,
    /// ISO weeks with at least one login.
    pub wau_weeks: usize,
    /// Months with at least one login.
    pub mau_months: usize,
}

impl OverviewSection {
    /// Share of the dataset kept by the filters, as a percentage.
    pub fn filtered_pct(&self) -> f64 {
        if self.total_rows > 0 {
            100.0 * self.filtered_rows as f64 / self.total_rows as f64
        } else {
            0.0
        }
    }

    /// Human-readable filter description.
    pub fn filters_formatted(&self) -> String {
        if self.filters.is_empty() {
            return "None".to_string();
        }
        self.filters
            .iter()
            .map(|f| format!("{}: {}", f.field, f.values.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Short fingerprint for display.
    pub fn fingerprint_short(&self) -> &str {
        let end = self.source_fingerprint.len().min(12);
        &self.source_fingerprint[..end]
    }
}
