//! Matiks dashboard configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for dashboard.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use settings::{DashboardConfig, FilterSelection, SectionToggles};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Default filename offered for the filtered CSV download.
pub const DEFAULT_EXPORT_FILENAME: &str = "filtered_matiks_data.csv";

/// MIME type of the CSV export.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Load the effective configuration.
///
/// Resolves the config path, reads it if one was found, and validates the
/// result. Falls back to built-in defaults when no file exists.
pub fn load_config(
    cli_path: Option<&std::path::Path>,
) -> ValidationResult<(DashboardConfig, ConfigPath)> {
    let resolved = resolve_config(cli_path);
    let config = match &resolved.path {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    validate_config(&config)?;
    Ok((config, resolved))
}
