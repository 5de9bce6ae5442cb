//! Report configuration types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

impl std::str::FromStr for ReportTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ReportTheme::Light),
            "dark" => Ok(ReportTheme::Dark),
            "auto" => Ok(ReportTheme::Auto),
            _ => Err(format!("unknown theme: {}", s)),
        }
    }
}

/// CDN library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnLibrary {
    /// Pinned version number.
    pub version: String,
    /// Subresource integrity hash (SHA-384), emitted only when known.
    #[serde(default)]
    pub sri: Option<String>,
    /// Path within npm package.
    #[serde(default)]
    pub path: Option<String>,
}

impl CdnLibrary {
    /// Create a new CDN library configuration.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            sri: None,
            path: None,
        }
    }

    /// Set the path within the npm package.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get the full CDN URL for this library.
    pub fn url(&self, base_url: &str, package_name: &str) -> String {
        let path = self.path.as_deref().unwrap_or("dist/index.min.js");
        format!("{}/{}@{}/{}", base_url, package_name, self.version, path)
    }
}

/// Report section visibility configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSections {
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

impl Default for ReportSections {
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

/// CDN configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    /// Base URL for CDN resources.
    #[serde(default = "default_cdn_base")]
    pub base_url: String,
    /// Library configurations.
    #[serde(default = "default_libraries")]
    pub libraries: HashMap<String, CdnLibrary>,
}

fn default_cdn_base() -> String {
    "https://cdn.jsdelivr.net/npm".to_string()
}

fn default_libraries() -> HashMap<String, CdnLibrary> {
    let mut libs = HashMap::new();

    // ECharts for line and bar charts
    libs.insert(
        "echarts".to_string(),
        CdnLibrary::new("5.5.0").with_path("dist/echarts.min.js"),
    );

    libs
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: default_cdn_base(),
            libraries: default_libraries(),
        }
    }
}

/// Resource limits for report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLimits {
    /// Maximum rows rendered in any table (churn list in particular).
    #[serde(default = "default_max_table_rows")]
    pub max_table_rows: usize,
}

fn default_max_table_rows() -> usize {
    1000
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            max_table_rows: default_max_table_rows(),
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Custom report title.
    pub title: Option<String>,
    /// Color theme.
    #[serde(default)]
    pub theme: ReportTheme,
    /// Section visibility.
    #[serde(default)]
    pub sections: ReportSections,
    /// CDN configuration.
    #[serde(default)]
    pub cdn_config: CdnConfig,
    /// Resource limits.
    #[serde(default)]
    pub limits: ReportLimits,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: None,
            theme: ReportTheme::default(),
            sections: ReportSections::default(),
            cdn_config: CdnConfig::default(),
            limits: ReportLimits::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Replace the section visibility settings.
    pub fn with_sections(mut self, sections: ReportSections) -> Self {
        self.sections = sections;
        self
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
