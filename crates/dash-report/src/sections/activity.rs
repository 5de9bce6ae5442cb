//! Active user section data.

use serde::{Deserialize, Serialize};

use super::series::CountPoint;

/// Daily, weekly and monthly active user series, each ascending by bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitySection {
    pub daily: Vec<CountPoint>,
    pub weekly: Vec<CountPoint>,
    pub monthly: Vec<CountPoint>,
}

impl ActivitySection {
    pub fn new(daily: Vec<CountPoint>, weekly: Vec<CountPoint>, monthly: Vec<CountPoint>) -> Self {
        Self {
            daily,
            weekly,
            monthly,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.weekly.is_empty() && self.monthly.is_empty()
    }

    /// Highest single-day active user count.
    pub fn peak_daily(&self) -> usize {
        self.daily.iter().map(|p| p.count).max().unwrap_or(0)
    }
}
