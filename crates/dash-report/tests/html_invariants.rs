//! HTML dashboard invariant tests.
//!
//! These tests validate the generated HTML structure without requiring a browser:
//! - Required document scaffolding and tabs present
//! - Disabled sections are omitted entirely
//! - Embedded chart data cannot terminate the script element
//! - The export link carries the filtered CSV

use chrono::Utc;
use dash_report::config::{ReportConfig, ReportSections};
use dash_report::generator::{ReportData, ReportGenerator};
use dash_report::sections::{
    ActivitySection, AppliedFilter, ChurnRow, ChurnSection, CohortSection, CountPoint,
    ExportSection, OverviewSection, RevenueSection, TopUserRow, TopUsersSection, ValuePoint,
};
use regex::Regex;

const CSV: &[u8] = b"User_ID,Username,Country\nU1,alice,US\nU2,bob,IN\n";

fn test_overview() -> OverviewSection {
    OverviewSection {
        source_name: "matiks_data.csv".to_string(),
        source_fingerprint: "ab".repeat(32),
        total_rows: 3,
        filtered_rows: 2,
        distinct_users: 2,
        total_revenue: Some(300.0),
        coercion_warnings: 0,
        filters: vec![AppliedFilter {
            field: "Country".to_string(),
            values: vec!["US".to_string(), "IN".to_string()],
        }],
        dau_days: 2,
        wau_weeks: 1,
        mau_months: 1,
    }
}

fn test_activity() -> ActivitySection {
    ActivitySection::new(
        vec![
            CountPoint::new("2024-01-01", 1),
            CountPoint::new("2024-01-02", 1),
        ],
        vec![CountPoint::new("2024-W01", 2)],
        vec![CountPoint::new("2024-01", 2)],
    )
}

fn test_revenue() -> RevenueSection {
    RevenueSection {
        monthly_trend: vec![ValuePoint::new("2024-01", 300.0)],
        by_device: vec![
            ValuePoint::new("Mobile", 100.0),
            ValuePoint::new("PC", 200.0),
        ],
        avg_by_game_mode: vec![ValuePoint::new("Solo", 150.0)],
    }
}

fn test_churn() -> ChurnSection {
    ChurnSection::new(
        14,
        Some("2024-01-30 00:00:00".to_string()),
        Some("2024-01-16 00:00:00".to_string()),
        vec![ChurnRow {
            user_id: "U1".to_string(),
            username: "alice".to_string(),
            last_login: "2024-01-01 00:00:00".to_string(),
            total_play_sessions: Some(4),
            total_revenue_usd: Some(100.0),
        }],
        1,
    )
}

fn test_top_users() -> TopUsersSection {
    TopUsersSection::new(
        10,
        vec![TopUserRow {
            user_id: "U2".to_string(),
            username: "bob".to_string(),
            total_revenue_usd: Some(200.0),
            total_hours_played: Some(12.5),
            in_game_purchases_count: Some(3),
            preferred_game_mode: "Solo".to_string(),
        }],
    )
}

fn full_test_report_data(config: ReportConfig) -> ReportData {
    ReportData {
        config,
        generated_at: Utc::now(),
        generator_version: "0.1.0-test".to_string(),
        overview: Some(test_overview()),
        activity: Some(test_activity()),
        revenue: Some(test_revenue()),
        churn: Some(test_churn()),
        top_users: Some(test_top_users()),
        cohort: Some(CohortSection::new(vec![ValuePoint::new("2023-12", 150.0)])),
        export: Some(ExportSection::from_csv(
            "filtered_matiks_data.csv",
            "text/csv",
            2,
            CSV,
        )),
    }
}

// ============================================================================
// HTML Structure Tests
// ============================================================================

mod structure {
    use super::*;

    #[test]
    fn test_html_doctype_present() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        assert!(
            html.starts_with("<!DOCTYPE html>"),
            "HTML must start with DOCTYPE declaration"
        );
    }

    #[test]
    fn test_html_has_required_meta_tags() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        assert!(html.contains(r#"charset="UTF-8""#));
        assert!(html.contains(r#"name="viewport""#));
        assert!(html.contains(r#"name="generator""#));
        assert!(html.contains(r#"name="robots" content="noindex, nofollow""#));
    }

    #[test]
    fn test_html_has_title() {
        let config = ReportConfig::new().with_title("Custom Test Report");
        let generator = ReportGenerator::new(config.clone());
        let html = generator.generate(full_test_report_data(config)).unwrap();

        assert!(html.contains("<title>Custom Test Report</title>"));
    }

    #[test]
    fn test_all_tabs_present() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        for tab in [
            "overview",
            "activity",
            "revenue",
            "churn",
            "top-users",
            "cohort",
            "export",
        ] {
            assert!(
                html.contains(&format!(r#"data-tab="{}""#, tab)),
                "missing tab button: {}",
                tab
            );
            assert!(
                html.contains(&format!(r#"id="tab-{}""#, tab)),
                "missing tab content: {}",
                tab
            );
        }
    }

    #[test]
    fn test_disabled_section_omitted() {
        let sections = ReportSections {
            churn: false,
            export: false,
            ..ReportSections::default()
        };
        let config = ReportConfig::new().with_sections(sections);
        let generator = ReportGenerator::new(config.clone());
        let html = generator.generate(full_test_report_data(config)).unwrap();

        assert!(!html.contains(r#"id="tab-churn""#));
        assert!(!html.contains(r#"id="tab-export""#));
        assert!(html.contains(r#"id="tab-revenue""#));
    }
}

// ============================================================================
// Content Tests
// ============================================================================

mod content {
    use super::*;

    #[test]
    fn test_overview_shows_filters_and_counts() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        assert!(html.contains("Country: US, IN"));
        assert!(html.contains("2 of 3"));
        assert!(html.contains("$300.00"));
    }

    #[test]
    fn test_churn_table_rows() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        assert!(html.contains(r#"id="churn-table""#));
        assert!(html.contains("Users inactive since before 2024-01-16 00:00:00"));
        let row = Regex::new(r"<tr><td>U1</td><td>alice</td><td>2024-01-01 00:00:00</td>").unwrap();
        assert!(row.is_match(&html));
    }

    #[test]
    fn test_churn_table_respects_row_limit() {
        let mut config = ReportConfig::default();
        config.limits.max_table_rows = 1;
        let mut data = full_test_report_data(config.clone());
        let users: Vec<ChurnRow> = (0..5)
            .map(|i| ChurnRow {
                user_id: format!("U{}", i),
                username: format!("user{}", i),
                last_login: "2024-01-01 00:00:00".to_string(),
                total_play_sessions: None,
                total_revenue_usd: None,
            })
            .collect();
        data.churn = Some(ChurnSection::new(14, None, None, users, 5));
        let html = ReportGenerator::new(config).generate(data).unwrap();

        let churn_tab = html
            .split(r#"id="tab-churn""#)
            .nth(1)
            .and_then(|rest| rest.split("</section>").next())
            .unwrap();
        assert_eq!(churn_tab.matches("<tr><td>").count(), 1);
        assert!(churn_tab.contains("Showing 1 of 5 churned users"));
        assert!(churn_tab.contains("N/A"));
    }

    #[test]
    fn test_top_users_ranked() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        assert!(html.contains(r#"id="top-users-table""#));
        assert!(html.contains("$200.00"));
        assert!(html.contains("12.5"));
    }

    #[test]
    fn test_empty_sections_render_notice() {
        let generator = ReportGenerator::default_config();
        let mut data = full_test_report_data(ReportConfig::default());
        data.revenue = Some(RevenueSection::default());
        data.churn = Some(ChurnSection::empty(14));
        let html = generator.generate(data).unwrap();

        assert!(html.contains(r#"id="tab-revenue""#));
        assert!(!html.contains(r#"id="revenue-trend-chart""#));
        assert!(html.contains("No login activity in the current view."));
        assert!(html.contains("No data for the current filters."));
    }

    #[test]
    fn test_churn_window_past_date_range_has_own_notice() {
        let generator = ReportGenerator::default_config();
        let mut data = full_test_report_data(ReportConfig::default());
        data.churn = Some(ChurnSection::new(
            200_000_000,
            Some("2024-02-01 00:00:00".to_string()),
            None,
            Vec::new(),
            0,
        ));
        let html = generator.generate(data).unwrap();

        assert!(html.contains(
            "A 200000000-day window before 2024-02-01 00:00:00 reaches past the supported date range"
        ));
        assert!(!html.contains("No login activity in the current view."));
    }
}

// ============================================================================
// Embedded Data Tests
// ============================================================================

mod embedded {
    use super::*;

    #[test]
    fn test_chart_data_cannot_close_script() {
        let generator = ReportGenerator::default_config();
        let mut data = full_test_report_data(ReportConfig::default());
        data.cohort = Some(CohortSection::new(vec![ValuePoint::new(
            "</script><script>alert(1)</script>",
            1.0,
        )]));
        let html = generator.generate(data).unwrap();

        // One close for the CDN loader, one for the inline script.
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_cdn_url_pinned() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        let re = Regex::new(r#"src="https://cdn\.jsdelivr\.net/npm/echarts@\d+\.\d+\.\d+/"#).unwrap();
        assert!(re.is_match(&html), "echarts must be loaded from a pinned version");
        assert!(!html.contains("integrity="), "no SRI without a configured hash");
    }

    #[test]
    fn test_export_link_carries_csv() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        let expected = ExportSection::from_csv("filtered_matiks_data.csv", "text/csv", 2, CSV);
        assert!(html.contains(&format!(r#"href="{}""#, expected.data_uri())));
        assert!(html.contains(r#"download="filtered_matiks_data.csv""#));
    }

    #[test]
    fn test_export_payload_not_in_chart_json() {
        let generator = ReportGenerator::default_config();
        let html = generator
            .generate(full_test_report_data(ReportConfig::default()))
            .unwrap();

        assert!(!html.contains("payload_base64"));
    }
}
