//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::settings::DashboardConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a dashboard configuration semantically.
pub fn validate_config(config: &DashboardConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.churn_threshold_days < 0 {
        return Err(ValidationError::InvalidValue {
            field: "churn_threshold_days".to_string(),
            message: format!("Must be >= 0, got {}", config.churn_threshold_days),
        });
    }

    if config.top_users == 0 {
        return Err(ValidationError::InvalidValue {
            field: "top_users".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    validate_export_filename(&config.export_filename)?;

    Ok(())
}

fn validate_export_filename(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "export_filename".to_string(),
            message: "Must not be empty".to_string(),
        });
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(ValidationError::InvalidValue {
            field: "export_filename".to_string(),
            message: format!("Must be a bare filename, got {:?}", name),
        });
    }
    if !trimmed.to_ascii_lowercase().ends_with(".csv") {
        return Err(ValidationError::InvalidValue {
            field: "export_filename".to_string(),
            message: format!("Must end with .csv, got {:?}", name),
        });
    }
    Ok(())
}
