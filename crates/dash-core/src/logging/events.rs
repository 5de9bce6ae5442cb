//! Structured event names and pipeline stages.
//!
//! Events are emitted as `tracing` fields (`event = ...`, `stage = ...`) so
//! JSONL output can be filtered on stable keys.

use serde::{Deserialize, Serialize};

/// Processing stages of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading and parsing the source.
    Load,
    /// Applying filter criteria.
    Filter,
    /// Computing one section's aggregates.
    Compute,
    /// HTML rendering.
    Render,
    /// Writing output files.
    Export,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Filter => "filter",
            Stage::Compute => "compute",
            Stage::Render => "render",
            Stage::Export => "export",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Dataset
    pub const DATASET_LOADED: &str = "dataset.loaded";
    pub const DATASET_COERCION: &str = "dataset.coercion";
    pub const DATASET_LOAD_FAILED: &str = "dataset.load_failed";
    pub const CACHE_HIT: &str = "cache.hit";
    pub const CACHE_STALE: &str = "cache.stale";

    // Render pass
    pub const FILTER_APPLIED: &str = "filter.applied";
    pub const SECTION_COMPUTED: &str = "section.computed";
    pub const SECTION_FAILED: &str = "section.failed";
    pub const REPORT_RENDERED: &str = "report.rendered";
    pub const EXPORT_WRITTEN: &str = "export.written";

    // Error events
    pub const INTERNAL_ERROR: &str = "internal_error";
}
