//! Error types for the report generator.

use std::path::PathBuf;

use dash_config::ValidationError;
use dash_report::ReportError;
use thiserror::Error;

/// Fatal dataset load failure. Aborts the render pass entirely.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("invalid value {value:?} for {column} on line {line}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A timestamp cell that could not be parsed and was loaded as null.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: unparseable {column} value {value:?}")]
pub struct CoercionWarning {
    pub line: u64,
    pub column: String,
    pub value: String,
}

/// An aggregate that could not be computed. Isolated to one section.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("{metric} is not finite for bucket {bucket}")]
    NonFinite { metric: &'static str, bucket: String },
}

/// Top-level error for the CLI and render pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("config: {0}")]
    Config(#[from] ValidationError),

    #[error("report: {0}")]
    Report(#[from] ReportError),

    #[error("export: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
