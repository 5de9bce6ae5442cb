//! Derived metrics over a filtered view.
//!
//! Every function here is pure: it reads the view and returns fresh output.
//! Date-keyed aggregates skip rows whose timestamp is null. Revenue sums and
//! means skip null revenue; a sum over only nulls is zero, and a mean over
//! only nulls is undefined so its bucket is omitted.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::ComputationError;
use crate::filter::View;
use crate::period::{Granularity, Period};
use crate::record::{columns, Record};

/// Categorical fields usable as revenue segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentField {
    Country,
    DeviceType,
    GameTitle,
    PreferredGameMode,
}

impl SegmentField {
    pub fn column_name(&self) -> &'static str {
        match self {
            SegmentField::Country => columns::COUNTRY,
            SegmentField::DeviceType => columns::DEVICE_TYPE,
            SegmentField::GameTitle => columns::GAME_TITLE,
            SegmentField::PreferredGameMode => columns::PREFERRED_GAME_MODE,
        }
    }

    pub fn value<'r>(&self, record: &'r Record) -> Option<&'r str> {
        match self {
            SegmentField::Country => record.country.as_deref(),
            SegmentField::DeviceType => record.device_type.as_deref(),
            SegmentField::GameTitle => record.game_title.as_deref(),
            SegmentField::PreferredGameMode => record.preferred_game_mode.as_deref(),
        }
    }
}

/// How revenue is combined within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregator {
    Sum,
    Mean,
}

/// Segment bucket. Null segment values land in `Unknown`, which sorts last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKey {
    Known(String),
    Unknown,
}

impl SegmentKey {
    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) => SegmentKey::Known(v.to_string()),
            None => SegmentKey::Unknown,
        }
    }

    /// The source value, `None` for the null bucket.
    pub fn value(&self) -> Option<&str> {
        match self {
            SegmentKey::Known(v) => Some(v),
            SegmentKey::Unknown => None,
        }
    }
}

/// Display label of the null bucket when no known value collides with it.
pub const UNKNOWN_LABEL: &str = "(unknown)";

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKey::Known(v) => f.write_str(v),
            SegmentKey::Unknown => f.write_str(UNKNOWN_LABEL),
        }
    }
}

/// Label the null bucket so it differs from every known value in `keys`.
///
/// Starts at [`UNKNOWN_LABEL`] and wraps it in further parentheses while a
/// known value of the same text exists.
pub fn unknown_label<'k>(keys: impl IntoIterator<Item = &'k SegmentKey>) -> String {
    let known: HashSet<&str> = keys.into_iter().filter_map(SegmentKey::value).collect();
    let mut label = UNKNOWN_LABEL.to_string();
    while known.contains(label.as_str()) {
        label = format!("({label})");
    }
    label
}

/// Segment buckets as `(label, value)` pairs with distinct labels, in key order.
pub fn labeled_segments(segments: &BTreeMap<SegmentKey, f64>) -> Vec<(String, f64)> {
    let unknown = unknown_label(segments.keys());
    segments
        .iter()
        .map(|(key, value)| match key {
            SegmentKey::Known(v) => (v.clone(), *value),
            SegmentKey::Unknown => (unknown.clone(), *value),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn finish(self, aggregator: Aggregator) -> Option<f64> {
        match aggregator {
            Aggregator::Sum => Some(self.sum),
            Aggregator::Mean if self.count > 0 => Some(self.sum / self.count as f64),
            Aggregator::Mean => None,
        }
    }
}

fn finite(
    metric: &'static str,
    bucket: impl fmt::Display,
    value: f64,
) -> Result<f64, ComputationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonFinite {
            metric,
            bucket: bucket.to_string(),
        })
    }
}

/// Distinct non-null `User_ID` per bucket of `Last_Login`, ascending.
pub fn compute_active_users(view: &View<'_>, granularity: Granularity) -> Vec<(Period, usize)> {
    let mut buckets: BTreeMap<Period, HashSet<&str>> = BTreeMap::new();
    for record in view.records() {
        let Some(date) = record.login_date() else {
            continue;
        };
        let users = buckets
            .entry(Period::containing(granularity, date))
            .or_default();
        if let Some(id) = record.user_id.as_deref() {
            users.insert(id);
        }
    }
    buckets
        .into_iter()
        .map(|(period, users)| (period, users.len()))
        .collect()
}

/// Total revenue per calendar month of `Last_Login`, ascending.
pub fn compute_revenue_trend(view: &View<'_>) -> Result<Vec<(Period, f64)>, ComputationError> {
    let mut buckets: BTreeMap<Period, Accumulator> = BTreeMap::new();
    for record in view.records() {
        if let Some(date) = record.login_date() {
            buckets
                .entry(Period::month(date))
                .or_default()
                .add(record.total_revenue_usd);
        }
    }
    buckets
        .into_iter()
        .map(|(period, acc)| Ok((period, finite("monthly revenue", period, acc.sum)?)))
        .collect()
}

/// Revenue per value of `field`.
pub fn compute_revenue_by_segment(
    view: &View<'_>,
    field: SegmentField,
    aggregator: Aggregator,
) -> Result<BTreeMap<SegmentKey, f64>, ComputationError> {
    let mut buckets: BTreeMap<SegmentKey, Accumulator> = BTreeMap::new();
    for record in view.records() {
        buckets
            .entry(SegmentKey::from_value(field.value(record)))
            .or_default()
            .add(record.total_revenue_usd);
    }
    let metric = match aggregator {
        Aggregator::Sum => "segment revenue",
        Aggregator::Mean => "segment mean revenue",
    };
    let mut out = BTreeMap::new();
    for (key, acc) in buckets {
        if let Some(value) = acc.finish(aggregator) {
            let value = finite(metric, &key, value)?;
            out.insert(key, value);
        }
    }
    Ok(out)
}

/// Most recent non-null `Last_Login` in the view.
pub fn latest_login(view: &View<'_>) -> Option<NaiveDateTime> {
    view.records().filter_map(|r| r.last_login).max()
}

/// `latest_login - threshold_days`, the instant before which users count as churned.
///
/// `None` when the view has no login at all or the window underflows the
/// calendar.
pub fn churn_cutoff(view: &View<'_>, threshold_days: i64) -> Option<NaiveDateTime> {
    let latest = latest_login(view)?;
    TimeDelta::try_days(threshold_days).and_then(|window| latest.checked_sub_signed(window))
}

/// Rows whose `Last_Login` is strictly earlier than the churn cutoff, in view order.
pub fn compute_churn<'a>(view: &View<'a>, threshold_days: i64) -> Vec<&'a Record> {
    let Some(cutoff) = churn_cutoff(view, threshold_days) else {
        return Vec::new();
    };
    view.records()
        .filter(|r| r.last_login.is_some_and(|ts| ts < cutoff))
        .collect()
}

fn revenue_desc_nulls_last(a: &Record, b: &Record) -> Ordering {
    match (a.total_revenue_usd, b.total_revenue_usd) {
        // Finite at load, so only signed zeros differ under total ordering.
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// First `n` rows by revenue descending. Ties keep view order.
pub fn compute_top_users<'a>(view: &View<'a>, n: usize) -> Vec<&'a Record> {
    let mut rows: Vec<&'a Record> = view.records().collect();
    rows.sort_by(|a, b| revenue_desc_nulls_last(a, b));
    rows.truncate(n);
    rows
}

/// Mean revenue per calendar month of `Signup_Date`.
pub fn compute_cohort_revenue(
    view: &View<'_>,
) -> Result<BTreeMap<Period, f64>, ComputationError> {
    let mut buckets: BTreeMap<Period, Accumulator> = BTreeMap::new();
    for record in view.records() {
        if let Some(date) = record.signup_day() {
            buckets
                .entry(Period::month(date))
                .or_default()
                .add(record.total_revenue_usd);
        }
    }
    let mut out = BTreeMap::new();
    for (period, acc) in buckets {
        if let Some(mean) = acc.finish(Aggregator::Mean) {
            out.insert(period, finite("cohort mean revenue", period, mean)?);
        }
    }
    Ok(out)
}

/// Distinct non-null `User_ID` values in the view.
pub fn distinct_users(view: &View<'_>) -> usize {
    view.records()
        .filter_map(|r| r.user_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Sum of non-null revenue in the view.
pub fn total_revenue(view: &View<'_>) -> Result<f64, ComputationError> {
    let sum = view.records().filter_map(|r| r.total_revenue_usd).sum();
    finite("total revenue", "all rows", sum)
}
