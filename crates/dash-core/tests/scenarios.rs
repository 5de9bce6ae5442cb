//! End-to-end scenarios over small in-memory datasets.
//!
//! Each test loads a CSV through `Dataset::from_bytes`, applies filters, and
//! checks the derived tables the dashboard renders.

use chrono::NaiveDate;
use dash_core::metrics::{
    churn_cutoff, compute_active_users, compute_churn, compute_cohort_revenue,
    compute_revenue_by_segment, compute_revenue_trend, compute_top_users, Aggregator,
    SegmentField, SegmentKey,
};
use dash_core::{export_csv, Dataset, FilterCriteria, Granularity, LoadError, Period};

const HEADER: &str = "User_ID,Username,Country,Device_Type,Game_Title,Preferred_Game_Mode,Total_Revenue_USD,Total_Hours_Played,Total_Play_Sessions,In_Game_Purchases_Count,Signup_Date,Last_Login";

fn dataset(rows: &[&str]) -> Dataset {
    let mut source = String::from(HEADER);
    source.push('\n');
    for row in rows {
        source.push_str(row);
        source.push('\n');
    }
    Dataset::from_bytes("scenario.csv", source.as_bytes()).expect("scenario dataset should load")
}

fn three_users() -> Dataset {
    dataset(&[
        "U1,alice,US,mobile,Chess,Solo,100,10,5,2,2023-12-01,2024-01-01",
        "U2,bob,US,desktop,Chess,Duo,200,20,8,4,2023-12-15,2024-01-10",
        "U3,chen,IN,mobile,Go,Solo,50,5,2,1,2024-01-03,2024-02-01",
    ])
}

fn user_ids(records: &[&dash_core::Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.user_id.clone().unwrap_or_default())
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Filtering and segments
// ============================================================================

mod country_filter {
    use super::*;

    #[test]
    fn us_filter_keeps_two_rows() {
        let ds = three_users();
        let view = ds.filter(&FilterCriteria::new().with_country(["US"]));
        assert_eq!(view.len(), 2);
        let ids: Vec<_> = view.records().filter_map(|r| r.user_id.clone()).collect();
        assert_eq!(ids, vec!["U1", "U2"]);
    }

    #[test]
    fn device_revenue_sums_per_segment() {
        let ds = three_users();
        let view = ds.filter(&FilterCriteria::new().with_country(["US"]));
        let by_device =
            compute_revenue_by_segment(&view, SegmentField::DeviceType, Aggregator::Sum).unwrap();
        assert_eq!(by_device.len(), 2);
        assert_eq!(by_device[&SegmentKey::Known("mobile".into())], 100.0);
        assert_eq!(by_device[&SegmentKey::Known("desktop".into())], 200.0);
    }

    #[test]
    fn top_users_ranked_by_revenue() {
        let ds = three_users();
        let view = ds.filter(&FilterCriteria::new().with_country(["US"]));
        assert_eq!(user_ids(&compute_top_users(&view, 10)), vec!["U2", "U1"]);
    }

    #[test]
    fn unmatched_value_yields_empty_view() {
        let ds = three_users();
        let view = ds.filter(&FilterCriteria::new().with_country(["BR"]));
        assert!(view.is_empty());
        assert!(compute_active_users(&view, Granularity::Day).is_empty());
        assert!(compute_revenue_trend(&view).unwrap().is_empty());
        assert!(compute_top_users(&view, 10).is_empty());
    }

    #[test]
    fn filters_combine_across_columns() {
        let ds = three_users();
        let criteria = FilterCriteria::new()
            .with_device_type(["mobile"])
            .with_game_title(["Go"]);
        let view = ds.filter(&criteria);
        let ids: Vec<_> = view.records().filter_map(|r| r.user_id.clone()).collect();
        assert_eq!(ids, vec!["U3"]);
    }
}

// ============================================================================
// Churn
// ============================================================================

mod churn {
    use super::*;

    #[test]
    fn cutoff_is_latest_login_minus_threshold() {
        let ds = three_users();
        let cutoff = churn_cutoff(&ds.view(), 14).unwrap();
        assert_eq!(cutoff.date(), date(2024, 1, 18));
    }

    #[test]
    fn unfiltered_view_churns_u1_and_u2() {
        let ds = three_users();
        let churned = compute_churn(&ds.view(), 14);
        assert_eq!(user_ids(&churned), vec!["U1", "U2"]);
    }

    #[test]
    fn churn_is_relative_to_the_filtered_view() {
        let ds = three_users();
        let view = ds.filter(&FilterCriteria::new().with_country(["US"]));
        // Latest login in the view is 2024-01-10, so the cutoff is 2023-12-27.
        assert!(compute_churn(&view, 14).is_empty());
        assert_eq!(user_ids(&compute_churn(&view, 5)), vec!["U1"]);
    }

    #[test]
    fn all_null_logins_yield_no_churn() {
        let ds = dataset(&[
            "U1,alice,US,mobile,Chess,Solo,100,10,5,2,2023-12-01,",
            "U2,bob,US,desktop,Chess,Duo,200,20,8,4,2023-12-15,not a date",
        ]);
        assert!(churn_cutoff(&ds.view(), 14).is_none());
        assert!(compute_churn(&ds.view(), 14).is_empty());
        assert!(compute_active_users(&ds.view(), Granularity::Day).is_empty());
    }

    #[test]
    fn rows_without_login_are_never_churned() {
        let ds = dataset(&[
            "U1,alice,US,mobile,Chess,Solo,100,10,5,2,2023-12-01,2024-01-01",
            "U2,bob,US,desktop,Chess,Duo,200,20,8,4,2023-12-15,",
            "U3,chen,IN,mobile,Go,Solo,50,5,2,1,2024-01-03,2024-02-01",
        ]);
        assert_eq!(user_ids(&compute_churn(&ds.view(), 14)), vec!["U1"]);
    }
}

// ============================================================================
// Time buckets
// ============================================================================

mod buckets {
    use super::*;

    #[test]
    fn active_users_count_distinct_ids() {
        let ds = dataset(&[
            "U1,alice,US,mobile,Chess,Solo,1,1,1,1,2023-12-01,2024-01-01 09:00:00",
            "U1,alice,US,desktop,Chess,Solo,1,1,1,1,2023-12-01,2024-01-01 21:00:00",
            "U2,bob,US,mobile,Chess,Solo,1,1,1,1,2023-12-01,2024-01-02",
        ]);
        let dau = compute_active_users(&ds.view(), Granularity::Day);
        assert_eq!(
            dau,
            vec![
                (Period::day(date(2024, 1, 1)), 1),
                (Period::day(date(2024, 1, 2)), 1),
            ]
        );
        let wau = compute_active_users(&ds.view(), Granularity::IsoWeek);
        assert_eq!(wau, vec![(Period::iso_week(date(2024, 1, 1)), 2)]);
    }

    #[test]
    fn monthly_revenue_is_ordered_by_month() {
        let ds = three_users();
        let trend = compute_revenue_trend(&ds.view()).unwrap();
        let labels: Vec<_> = trend.iter().map(|(p, _)| p.label()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02"]);
        assert_eq!(trend[0].1, 300.0);
        assert_eq!(trend[1].1, 50.0);
    }

    #[test]
    fn cohort_revenue_is_mean_by_signup_month() {
        let ds = three_users();
        let cohorts = compute_cohort_revenue(&ds.view()).unwrap();
        assert_eq!(cohorts[&Period::month(date(2023, 12, 1))], 150.0);
        assert_eq!(cohorts[&Period::month(date(2024, 1, 1))], 50.0);
    }

    #[test]
    fn game_mode_mean_groups_missing_as_unknown() {
        let ds = dataset(&[
            "U1,alice,US,mobile,Chess,Solo,100,1,1,1,2023-12-01,2024-01-01",
            "U2,bob,US,mobile,Chess,,30,1,1,1,2023-12-01,2024-01-01",
            "U3,chen,US,mobile,Chess,Solo,50,1,1,1,2023-12-01,2024-01-01",
        ]);
        let modes =
            compute_revenue_by_segment(&ds.view(), SegmentField::PreferredGameMode, Aggregator::Mean)
                .unwrap();
        let keys: Vec<_> = modes.keys().cloned().collect();
        assert_eq!(keys, vec![SegmentKey::Known("Solo".into()), SegmentKey::Unknown]);
        assert_eq!(modes[&SegmentKey::Known("Solo".into())], 75.0);
        assert_eq!(modes[&SegmentKey::Unknown], 30.0);
    }
}

// ============================================================================
// Load errors and export
// ============================================================================

mod load_and_export {
    use super::*;

    #[test]
    fn missing_required_column_is_reported() {
        let err = Dataset::from_bytes("bad.csv", b"User_ID,Username\nU1,alice\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn non_numeric_revenue_is_rejected() {
        let source = format!("{HEADER}\nU1,alice,US,mobile,Chess,Solo,lots,1,1,1,2023-12-01,2024-01-01\n");
        let err = Dataset::from_bytes("bad.csv", source.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { .. }));
    }

    #[test]
    fn unparseable_dates_become_warnings() {
        let ds = dataset(&["U1,alice,US,mobile,Chess,Solo,1,1,1,1,someday,2024-01-01"]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.warnings().len(), 1);
        assert!(ds.records()[0].signup_date.is_none());
    }

    #[test]
    fn export_of_unfiltered_view_round_trips() {
        let ds = three_users();
        let bytes = export_csv(&ds.view()).unwrap();
        let reloaded = Dataset::from_bytes("export.csv", &bytes).unwrap();
        assert_eq!(reloaded.records(), ds.records());
        assert_eq!(reloaded.fingerprint(), ds.fingerprint());
    }

    #[test]
    fn export_of_filtered_view_keeps_header_and_matching_rows() {
        let ds = three_users();
        let view = ds.filter(&FilterCriteria::new().with_country(["IN"]));
        let text = String::from_utf8(export_csv(&view).unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("U3,chen,IN"));
    }
}
