//! Chart-ready series points shared by several sections.

use serde::{Deserialize, Serialize};

/// One bucket of a distinct-count series (e.g. DAU for one day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPoint {
    /// Bucket label ("2024-01-05", "2024-W01", "2024-01").
    pub label: String,
    /// Distinct users in the bucket.
    pub count: usize,
}

impl CountPoint {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// One bucket of a monetary series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub label: String,
    pub value: f64,
}

impl ValuePoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Value formatted as US dollars.
    pub fn value_formatted(&self) -> String {
        format_usd(self.value)
    }
}

/// Format an amount as US dollars with two decimals.
pub fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${:.2}", value)
    }
}
