//! Typed player records and the source column schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Display format for timestamps in tables and summaries.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Required source columns. Names are case-sensitive.
pub mod columns {
    pub const USER_ID: &str = "User_ID";
    pub const USERNAME: &str = "Username";
    pub const COUNTRY: &str = "Country";
    pub const DEVICE_TYPE: &str = "Device_Type";
    pub const GAME_TITLE: &str = "Game_Title";
    pub const PREFERRED_GAME_MODE: &str = "Preferred_Game_Mode";
    pub const TOTAL_REVENUE_USD: &str = "Total_Revenue_USD";
    pub const TOTAL_HOURS_PLAYED: &str = "Total_Hours_Played";
    pub const TOTAL_PLAY_SESSIONS: &str = "Total_Play_Sessions";
    pub const IN_GAME_PURCHASES_COUNT: &str = "In_Game_Purchases_Count";
    pub const SIGNUP_DATE: &str = "Signup_Date";
    pub const LAST_LOGIN: &str = "Last_Login";

    pub const REQUIRED: [&str; 12] = [
        USER_ID,
        USERNAME,
        COUNTRY,
        DEVICE_TYPE,
        GAME_TITLE,
        PREFERRED_GAME_MODE,
        TOTAL_REVENUE_USD,
        TOTAL_HOURS_PLAYED,
        TOTAL_PLAY_SESSIONS,
        IN_GAME_PURCHASES_COUNT,
        SIGNUP_DATE,
        LAST_LOGIN,
    ];
}

/// One row of the dataset. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub country: Option<String>,
    pub device_type: Option<String>,
    pub game_title: Option<String>,
    pub preferred_game_mode: Option<String>,
    pub total_revenue_usd: Option<f64>,
    pub total_hours_played: Option<f64>,
    pub total_play_sessions: Option<i64>,
    pub in_game_purchases_count: Option<i64>,
    pub signup_date: Option<NaiveDateTime>,
    pub last_login: Option<NaiveDateTime>,
}

impl Record {
    /// Calendar date of the last login.
    pub fn login_date(&self) -> Option<NaiveDate> {
        self.last_login.map(|ts| ts.date())
    }

    /// Calendar date of signup.
    pub fn signup_day(&self) -> Option<NaiveDate> {
        self.signup_date.map(|ts| ts.date())
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp cell.
///
/// Accepts RFC 3339 (converted to its naive UTC value) and a fixed list of
/// locale-independent layouts. Date-only values land at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format an optional timestamp for display.
pub fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(TIMESTAMP_DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso_datetime() {
        let ts = parse_timestamp("2024-01-10 13:45:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 10));
        assert_eq!((ts.hour(), ts.minute()), (13, 45));
    }

    #[test]
    fn test_parse_fractional_and_t_separator() {
        assert!(parse_timestamp("2024-01-10T13:45:00.250").is_some());
        assert!(parse_timestamp("2024-01-10 13:45:00.5").is_some());
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let ts = parse_timestamp("2024-01-10T01:00:00+02:00").unwrap();
        assert_eq!(ts.day(), 9);
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let ts = parse_timestamp("2024-02-01").unwrap();
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (0, 0, 0));
        assert_eq!(parse_timestamp("02/01/2024"), parse_timestamp("2024-02-01"));
        assert_eq!(parse_timestamp("2024/02/01"), parse_timestamp("2024-02-01"));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(format_timestamp(Some(ts)), "2024-01-01 00:00:00");
        assert_eq!(format_timestamp(None), "");
    }

    #[test]
    fn test_login_date_projection() {
        let record = Record {
            last_login: parse_timestamp("2024-03-05 23:59:59"),
            ..Record::default()
        };
        assert_eq!(
            record.login_date(),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(Record::default().login_date(), None);
    }
}
