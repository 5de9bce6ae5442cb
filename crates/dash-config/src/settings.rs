//! Dashboard configuration (dashboard.json).
//!
//! Every field is optional in the file; missing fields take the defaults of
//! the reference dashboard (14-day churn window, top 10 users).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Default filter selections applied when the command line gives none.
///
/// An empty list means "no restriction" for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub country: Vec<String>,
    #[serde(default)]
    pub device_type: Vec<String>,
    #[serde(default)]
    pub game_title: Vec<String>,
}

impl FilterSelection {
    /// True when no field carries a restriction.
    pub fn is_unrestricted(&self) -> bool {
        self.country.is_empty() && self.device_type.is_empty() && self.game_title.is_empty()
    }
}

/// Which dashboard sections are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionToggles {
    #[serde(default = "default_true")]
    pub overview: bool,
    #[serde(default = "default_true")]
    pub activity: bool,
    #[serde(default = "default_true")]
    pub revenue: bool,
    #[serde(default = "default_true")]
    pub churn: bool,
    #[serde(default = "default_true")]
    pub top_users: bool,
    #[serde(default = "default_true")]
    pub cohort: bool,
    #[serde(default = "default_true")]
    pub export: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self {
            overview: true,
            activity: true,
            revenue: true,
            churn: true,
            top_users: true,
            cohort: true,
            export: true,
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Custom dashboard title.
    #[serde(default)]
    pub title: Option<String>,

    /// Inactivity window (days) before a user counts as churned.
    #[serde(default = "default_churn_threshold_days")]
    pub churn_threshold_days: i64,

    /// Rows shown in the top users table.
    #[serde(default = "default_top_users")]
    pub top_users: usize,

    /// Filename offered for the filtered CSV download.
    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    #[serde(default)]
    pub filters: FilterSelection,

    #[serde(default)]
    pub sections: SectionToggles,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_churn_threshold_days() -> i64 {
    14
}

fn default_top_users() -> usize {
    10
}

fn default_export_filename() -> String {
    crate::DEFAULT_EXPORT_FILENAME.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: None,
            churn_threshold_days: default_churn_threshold_days(),
            top_users: default_top_users(),
            export_filename: default_export_filename(),
            filters: FilterSelection::default(),
            sections: SectionToggles::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))?;
        config.export_filename = config.export_filename.trim().to_string();
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
