//! Machine-readable summary of one render pass.
//!
//! Carries the seven derived entities plus view counts, serialized as JSON
//! by the `summary` command. Aggregates that fail to compute are reported
//! under `errors` and left empty.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::ComputationError;
use crate::filter::{FilterCriteria, View};
use crate::metrics::{self, Aggregator, SegmentField, SegmentKey};
use crate::period::{Granularity, Period};
use crate::record::Record;

/// Summary output schema version.
pub const SUMMARY_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct BucketCount {
    pub period: Period,
    pub users: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketValue {
    pub period: Period,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChurnSummary {
    pub threshold_days: i64,
    pub latest_login: Option<NaiveDateTime>,
    pub cutoff: Option<NaiveDateTime>,
    pub users: Vec<Record>,
}

/// Revenue of one segment. `segment` is null for rows with no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentValue {
    pub segment: Option<String>,
    pub revenue: f64,
}

fn segment_values(segments: BTreeMap<SegmentKey, f64>) -> Vec<SegmentValue> {
    segments
        .into_iter()
        .map(|(key, revenue)| SegmentValue {
            segment: key.value().map(str::to_string),
            revenue,
        })
        .collect()
}

/// A failed aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct SectionError {
    pub section: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub fingerprint: String,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub distinct_users: usize,
    pub total_revenue: Option<f64>,
    pub coercion_warnings: usize,
    pub filters: BTreeMap<&'static str, Vec<String>>,
    pub daily_active_users: Vec<BucketCount>,
    pub weekly_active_users: Vec<BucketCount>,
    pub monthly_active_users: Vec<BucketCount>,
    pub monthly_revenue: Vec<BucketValue>,
    pub revenue_by_device_type: Vec<SegmentValue>,
    pub avg_revenue_by_game_mode: Vec<SegmentValue>,
    pub churn: ChurnSummary,
    pub top_users: Vec<Record>,
    pub cohort_revenue: BTreeMap<Period, f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SectionError>,
}

impl Summary {
    pub fn compute(
        view: &View<'_>,
        criteria: &FilterCriteria,
        churn_threshold_days: i64,
        top_n: usize,
    ) -> Self {
        let dataset = view.dataset();
        let mut errors = Vec::new();
        let total_revenue = keep(
            &mut errors,
            "total_revenue",
            metrics::total_revenue(view).map(Some),
        )
        .flatten();
        let monthly_revenue = keep(
            &mut errors,
            "monthly_revenue",
            metrics::compute_revenue_trend(view).map(|trend| {
                trend
                    .into_iter()
                    .map(|(period, revenue)| BucketValue { period, revenue })
                    .collect::<Vec<_>>()
            }),
        )
        .unwrap_or_default();
        let revenue_by_device_type = keep(
            &mut errors,
            "revenue_by_device_type",
            metrics::compute_revenue_by_segment(view, SegmentField::DeviceType, Aggregator::Sum)
                .map(segment_values),
        )
        .unwrap_or_default();
        let avg_revenue_by_game_mode = keep(
            &mut errors,
            "avg_revenue_by_game_mode",
            metrics::compute_revenue_by_segment(
                view,
                SegmentField::PreferredGameMode,
                Aggregator::Mean,
            )
            .map(segment_values),
        )
        .unwrap_or_default();
        let cohort_revenue = keep(
            &mut errors,
            "cohort_revenue",
            metrics::compute_cohort_revenue(view),
        )
        .unwrap_or_default();

        Self {
            schema_version: SUMMARY_SCHEMA_VERSION,
            generated_at: Utc::now(),
            source: dataset.source_name().to_string(),
            fingerprint: dataset.fingerprint().to_string(),
            total_rows: dataset.len(),
            filtered_rows: view.len(),
            distinct_users: metrics::distinct_users(view),
            total_revenue,
            coercion_warnings: dataset.warnings().len(),
            filters: criteria.restrictions().into_iter().collect(),
            daily_active_users: active(view, Granularity::Day),
            weekly_active_users: active(view, Granularity::IsoWeek),
            monthly_active_users: active(view, Granularity::CalendarMonth),
            monthly_revenue,
            revenue_by_device_type,
            avg_revenue_by_game_mode,
            churn: ChurnSummary {
                threshold_days: churn_threshold_days,
                latest_login: metrics::latest_login(view),
                cutoff: metrics::churn_cutoff(view, churn_threshold_days),
                users: metrics::compute_churn(view, churn_threshold_days)
                    .into_iter()
                    .cloned()
                    .collect(),
            },
            top_users: metrics::compute_top_users(view, top_n)
                .into_iter()
                .cloned()
                .collect(),
            cohort_revenue,
            errors,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn keep<T>(
    errors: &mut Vec<SectionError>,
    section: &'static str,
    result: Result<T, ComputationError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(SectionError {
                section,
                message: err.to_string(),
            });
            None
        }
    }
}

fn active(view: &View<'_>, granularity: Granularity) -> Vec<BucketCount> {
    metrics::compute_active_users(view, granularity)
        .into_iter()
        .map(|(period, users)| BucketCount { period, users })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    const SOURCE: &str = "User_ID,Username,Country,Device_Type,Game_Title,Preferred_Game_Mode,Total_Revenue_USD,Total_Hours_Played,Total_Play_Sessions,In_Game_Purchases_Count,Signup_Date,Last_Login
U1,alice,US,mobile,Chess,Solo,100,10,5,2,2023-12-01,2024-01-01
U2,bob,US,,Chess,Duo,200,20,8,4,2023-12-15,2024-01-10
U3,chen,IN,mobile,Go,Solo,50,5,2,1,2024-01-03,2024-02-01
";

    #[test]
    fn test_summary_json_shape() {
        let ds = Dataset::from_bytes("m.csv", SOURCE.as_bytes()).unwrap();
        let criteria = FilterCriteria::new().with_country(["US"]);
        let view = ds.filter(&criteria);
        let summary = Summary::compute(&view, &criteria, 14, 10);
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();

        assert_eq!(json["filtered_rows"], 2);
        assert_eq!(json["filters"]["Country"][0], "US");
        assert_eq!(
            json["revenue_by_device_type"],
            serde_json::json!([
                {"segment": "mobile", "revenue": 100.0},
                {"segment": null, "revenue": 200.0},
            ])
        );
        assert_eq!(json["cohort_revenue"]["2023-12"], 150.0);
        assert_eq!(json["monthly_revenue"][0]["period"], "2024-01");
        assert_eq!(json["top_users"][0]["user_id"], "U2");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_summary_records_failed_aggregates() {
        let source = "User_ID,Username,Country,Device_Type,Game_Title,Preferred_Game_Mode,Total_Revenue_USD,Total_Hours_Played,Total_Play_Sessions,In_Game_Purchases_Count,Signup_Date,Last_Login
U1,a,US,mobile,Chess,Solo,1e308,1,1,1,,2024-01-01
U2,b,US,mobile,Chess,Solo,1e308,1,1,1,,2024-01-02
";
        let ds = Dataset::from_bytes("big.csv", source.as_bytes()).unwrap();
        let summary = Summary::compute(&ds.view(), &FilterCriteria::new(), 14, 10);
        assert!(summary.total_revenue.is_none());
        assert!(summary.monthly_revenue.is_empty());
        assert!(summary.errors.iter().any(|e| e.section == "monthly_revenue"));
        assert_eq!(summary.daily_active_users.len(), 2);
    }

    #[test]
    fn test_literal_unknown_segment_survives_json() {
        let source = "User_ID,Username,Country,Device_Type,Game_Title,Preferred_Game_Mode,Total_Revenue_USD,Total_Hours_Played,Total_Play_Sessions,In_Game_Purchases_Count,Signup_Date,Last_Login
U1,a,US,Unknown,Chess,Solo,100,1,1,1,,2024-01-01
U2,b,US,,Chess,Solo,7,1,1,1,,2024-01-02
";
        let ds = Dataset::from_bytes("u.csv", source.as_bytes()).unwrap();
        let summary = Summary::compute(&ds.view(), &FilterCriteria::new(), 14, 10);
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();

        let devices = json["revenue_by_device_type"].as_array().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0]["segment"], "Unknown");
        assert_eq!(devices[0]["revenue"], 100.0);
        assert!(devices[1]["segment"].is_null());
        assert_eq!(devices[1]["revenue"], 7.0);
    }
}
