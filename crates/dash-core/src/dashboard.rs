//! One render pass: load, filter, compute every section, render HTML.
//!
//! Sections are computed independently. A [`ComputationError`] in one chart
//! or table is logged and that part renders empty; the rest of the dashboard
//! is unaffected. Only a [`LoadError`] aborts the pass.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use dash_config::{DashboardConfig, EXPORT_MIME_TYPE};
use dash_report::sections::{
    ActivitySection, AppliedFilter, ChurnRow, ChurnSection, CohortSection, CountPoint,
    ExportSection, OverviewSection, RevenueSection, TopUserRow, TopUsersSection, ValuePoint,
};
use dash_report::{ReportConfig, ReportData, ReportGenerator, ReportSections, ReportTheme};
use tracing::{debug, info, warn};

use crate::cache::DatasetCache;
use crate::dataset::Dataset;
use crate::error::{ComputationError, LoadError, Result};
use crate::export::export_csv;
use crate::filter::{FilterCriteria, View};
use crate::logging::{event_names, Stage};
use crate::metrics::{self, Aggregator, SegmentField, SegmentKey};
use crate::period::{Granularity, Period};
use crate::record::{format_timestamp, Record};

/// Report generator bound to a configuration and a dataset cache.
pub struct Dashboard {
    config: DashboardConfig,
    cache: DatasetCache,
    generator: ReportGenerator,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_cache(config, DatasetCache::new())
    }

    /// Use an existing cache, e.g. one shared across several passes.
    pub fn with_cache(config: DashboardConfig, cache: DatasetCache) -> Self {
        let generator = ReportGenerator::new(report_config(&config));
        Self {
            config,
            cache,
            generator,
        }
    }

    /// Override the report color theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        let config = self.generator.config().clone().with_theme(theme);
        self.generator = ReportGenerator::new(config);
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Load `path` through the cache.
    pub fn load(&mut self, path: &Path) -> std::result::Result<Arc<Dataset>, LoadError> {
        self.cache.get_or_load(path).inspect_err(|e| {
            warn!(
                event = event_names::DATASET_LOAD_FAILED,
                stage = %Stage::Load,
                path = %path.display(),
                error = %e,
                "Dataset load failed"
            );
        })
    }

    /// Full pass: load `path`, filter, and render the HTML dashboard.
    pub fn render(&mut self, path: &Path, criteria: &FilterCriteria) -> Result<String> {
        let dataset = self.load(path)?;
        let view = dataset.filter(criteria);
        info!(
            event = event_names::FILTER_APPLIED,
            stage = %Stage::Filter,
            rows = view.len(),
            total = dataset.len(),
            "Filters applied"
        );
        let data = self.build(&view, criteria);
        let html = self.generator.generate(data)?;
        info!(
            event = event_names::REPORT_RENDERED,
            stage = %Stage::Render,
            bytes = html.len(),
            "Dashboard rendered"
        );
        Ok(html)
    }

    /// The single top-level page shown when the dataset cannot be loaded.
    pub fn error_page(&self, err: &LoadError) -> String {
        self.generator.generate_error_page(&err.to_string())
    }

    /// Compute every enabled section from `view`.
    pub fn build(&self, view: &View<'_>, criteria: &FilterCriteria) -> ReportData {
        let sections = &self.config.sections;
        let mut data = ReportData::empty(self.generator.config().clone());

        let activity = (sections.activity || sections.overview).then(|| build_activity(view));

        if sections.overview {
            data.overview = Some(build_overview(view, criteria, activity.as_ref()));
        }
        if sections.activity {
            data.activity = activity;
        }
        if sections.revenue {
            data.revenue = Some(build_revenue(view));
        }
        if sections.churn {
            let limit = self.generator.config().limits.max_table_rows;
            data.churn = Some(build_churn(view, self.config.churn_threshold_days, limit));
        }
        if sections.top_users {
            data.top_users = Some(build_top_users(view, self.config.top_users));
        }
        if sections.cohort {
            data.cohort = Some(build_cohort(view));
        }
        if sections.export {
            data.export = build_export(view, &self.config.export_filename);
        }

        data
    }
}

/// Report configuration derived from the dashboard configuration.
pub fn report_config(config: &DashboardConfig) -> ReportConfig {
    let toggles = &config.sections;
    let mut report = ReportConfig::new().with_sections(ReportSections {
        overview: toggles.overview,
        activity: toggles.activity,
        revenue: toggles.revenue,
        churn: toggles.churn,
        top_users: toggles.top_users,
        cohort: toggles.cohort,
        export: toggles.export,
    });
    if let Some(title) = &config.title {
        report = report.with_title(title.clone());
    }
    report
}

/// Log a failed aggregate and substitute `fallback`.
fn isolate<T>(
    section: &'static str,
    result: std::result::Result<T, ComputationError>,
    fallback: T,
) -> T {
    match result {
        Ok(value) => {
            debug!(
                event = event_names::SECTION_COMPUTED,
                stage = %Stage::Compute,
                section,
                "Aggregate computed"
            );
            value
        }
        Err(err) => {
            warn!(
                event = event_names::SECTION_FAILED,
                stage = %Stage::Compute,
                section,
                error = %err,
                "Aggregate failed; rendering empty"
            );
            fallback
        }
    }
}

fn count_points(series: Vec<(Period, usize)>) -> Vec<CountPoint> {
    series
        .into_iter()
        .map(|(period, count)| CountPoint::new(period.label(), count))
        .collect()
}

fn period_points(series: impl IntoIterator<Item = (Period, f64)>) -> Vec<ValuePoint> {
    series
        .into_iter()
        .map(|(period, value)| ValuePoint::new(period.label(), value))
        .collect()
}

fn segment_points(segments: BTreeMap<SegmentKey, f64>) -> Vec<ValuePoint> {
    metrics::labeled_segments(&segments)
        .into_iter()
        .map(|(label, value)| ValuePoint::new(label, value))
        .collect()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn build_activity(view: &View<'_>) -> ActivitySection {
    ActivitySection::new(
        count_points(metrics::compute_active_users(view, Granularity::Day)),
        count_points(metrics::compute_active_users(view, Granularity::IsoWeek)),
        count_points(metrics::compute_active_users(view, Granularity::CalendarMonth)),
    )
}

fn build_overview(
    view: &View<'_>,
    criteria: &FilterCriteria,
    activity: Option<&ActivitySection>,
) -> OverviewSection {
    let dataset = view.dataset();
    let total_revenue = isolate("overview", metrics::total_revenue(view).map(Some), None);
    OverviewSection {
        source_name: dataset.source_name().to_string(),
        source_fingerprint: dataset.fingerprint().to_string(),
        total_rows: dataset.len(),
        filtered_rows: view.len(),
        distinct_users: metrics::distinct_users(view),
        total_revenue,
        coercion_warnings: dataset.warnings().len(),
        filters: criteria
            .restrictions()
            .into_iter()
            .map(|(field, values)| AppliedFilter {
                field: field.to_string(),
                values,
            })
            .collect(),
        dau_days: activity.map_or(0, |a| a.daily.len()),
        wau_weeks: activity.map_or(0, |a| a.weekly.len()),
        mau_months: activity.map_or(0, |a| a.monthly.len()),
    }
}

fn build_revenue(view: &View<'_>) -> RevenueSection {
    let monthly_trend = isolate(
        "revenue.monthly_trend",
        metrics::compute_revenue_trend(view).map(period_points),
        Vec::new(),
    );
    let by_device = isolate(
        "revenue.by_device",
        metrics::compute_revenue_by_segment(view, SegmentField::DeviceType, Aggregator::Sum)
            .map(segment_points),
        Vec::new(),
    );
    let avg_by_game_mode = isolate(
        "revenue.avg_by_game_mode",
        metrics::compute_revenue_by_segment(
            view,
            SegmentField::PreferredGameMode,
            Aggregator::Mean,
        )
        .map(segment_points),
        Vec::new(),
    );
    RevenueSection {
        monthly_trend,
        by_device,
        avg_by_game_mode,
    }
}

fn churn_row(record: &Record) -> ChurnRow {
    ChurnRow {
        user_id: text(&record.user_id),
        username: text(&record.username),
        last_login: format_timestamp(record.last_login),
        total_play_sessions: record.total_play_sessions,
        total_revenue_usd: record.total_revenue_usd,
    }
}

fn build_churn(view: &View<'_>, threshold_days: i64, limit: usize) -> ChurnSection {
    let Some(latest) = metrics::latest_login(view) else {
        return ChurnSection::empty(threshold_days);
    };
    let latest = Some(format_timestamp(Some(latest)));
    // A window reaching past the calendar's start churns nobody.
    let Some(cutoff) = metrics::churn_cutoff(view, threshold_days) else {
        return ChurnSection::new(threshold_days, latest, None, Vec::new(), 0);
    };
    let churned = metrics::compute_churn(view, threshold_days);
    let total = churned.len();
    let rows = churned.into_iter().take(limit).map(churn_row).collect();
    ChurnSection::new(
        threshold_days,
        latest,
        Some(format_timestamp(Some(cutoff))),
        rows,
        total,
    )
}

fn build_top_users(view: &View<'_>, n: usize) -> TopUsersSection {
    let users = metrics::compute_top_users(view, n)
        .into_iter()
        .map(|r| TopUserRow {
            user_id: text(&r.user_id),
            username: text(&r.username),
            total_revenue_usd: r.total_revenue_usd,
            total_hours_played: r.total_hours_played,
            in_game_purchases_count: r.in_game_purchases_count,
            preferred_game_mode: text(&r.preferred_game_mode),
        })
        .collect();
    TopUsersSection::new(n, users)
}

fn build_cohort(view: &View<'_>) -> CohortSection {
    isolate(
        "cohort",
        metrics::compute_cohort_revenue(view).map(|c| CohortSection::new(period_points(c))),
        CohortSection::default(),
    )
}

fn build_export(view: &View<'_>, filename: &str) -> Option<ExportSection> {
    match export_csv(view) {
        Ok(bytes) => Some(ExportSection::from_csv(
            filename,
            EXPORT_MIME_TYPE,
            view.len(),
            &bytes,
        )),
        Err(err) => {
            warn!(
                event = event_names::SECTION_FAILED,
                stage = %Stage::Export,
                section = "export",
                error = %err,
                "CSV export failed; omitting download"
            );
            None
        }
    }
}
