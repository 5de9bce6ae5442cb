//! Equality-set filters and filtered views.

use std::collections::BTreeSet;

use dash_config::FilterSelection;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::record::{columns, Record};

/// Selected values per filter field.
///
/// An empty set places no restriction on its field. Fields compose with AND.
/// A row whose value is null for a restricted field never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub country: BTreeSet<String>,
    pub device_type: BTreeSet<String>,
    pub game_title: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_device_type<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.device_type.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_game_title<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.game_title.extend(values.into_iter().map(Into::into));
        self
    }

    /// Build criteria from a configured default selection.
    pub fn from_selection(selection: &FilterSelection) -> Self {
        Self::new()
            .with_country(selection.country.iter().cloned())
            .with_device_type(selection.device_type.iter().cloned())
            .with_game_title(selection.game_title.iter().cloned())
    }

    /// True when no field is restricted.
    pub fn is_unrestricted(&self) -> bool {
        self.country.is_empty() && self.device_type.is_empty() && self.game_title.is_empty()
    }

    /// Restricted fields as (column name, sorted values).
    pub fn restrictions(&self) -> Vec<(&'static str, Vec<String>)> {
        [
            (columns::COUNTRY, &self.country),
            (columns::DEVICE_TYPE, &self.device_type),
            (columns::GAME_TITLE, &self.game_title),
        ]
        .into_iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(name, set)| (name, set.iter().cloned().collect()))
        .collect()
    }

    pub fn matches(&self, record: &Record) -> bool {
        field_matches(&self.country, record.country.as_deref())
            && field_matches(&self.device_type, record.device_type.as_deref())
            && field_matches(&self.game_title, record.game_title.as_deref())
    }
}

fn field_matches(allowed: &BTreeSet<String>, value: Option<&str>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    value.is_some_and(|v| allowed.contains(v))
}

/// Read-only filtered subset of a dataset, held as row indices in source order.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> View<'a> {
    pub(crate) fn new(dataset: &'a Dataset, rows: Vec<usize>) -> Self {
        Self { dataset, rows }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Source row indices retained by this view.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in view order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.rows.iter().filter_map(move |&i| records.get(i))
    }

    /// Narrow this view further.
    pub fn filter(&self, criteria: &FilterCriteria) -> View<'a> {
        let records = self.dataset.records();
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| records.get(i).is_some_and(|r| criteria.matches(r)))
            .collect();
        View::new(self.dataset, rows)
    }
}

impl PartialEq for View<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.rows == other.rows
    }
}

/// Values offered by each filter field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub country: Vec<String>,
    pub device_type: Vec<String>,
    pub game_title: Vec<String>,
}

impl FilterOptions {
    /// Sorted distinct non-null values over the unfiltered dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut country = BTreeSet::new();
        let mut device_type = BTreeSet::new();
        let mut game_title = BTreeSet::new();
        for r in dataset.records() {
            if let Some(v) = &r.country {
                country.insert(v.clone());
            }
            if let Some(v) = &r.device_type {
                device_type.insert(v.clone());
            }
            if let Some(v) = &r.game_title {
                game_title.insert(v.clone());
            }
        }
        Self {
            country: country.into_iter().collect(),
            device_type: device_type.into_iter().collect(),
            game_title: game_title.into_iter().collect(),
        }
    }
}
