//! Cohort section data.

use serde::{Deserialize, Serialize};

use super::series::ValuePoint;

/// Average revenue per user, grouped by signup month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortSection {
    pub cohorts: Vec<ValuePoint>,
}

impl CohortSection {
    pub fn new(cohorts: Vec<ValuePoint>) -> Self {
        Self { cohorts }
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    /// Cohort with the highest average revenue.
    pub fn best_cohort(&self) -> Option<&ValuePoint> {
        self.cohorts.iter().max_by(|a, b| a.value.total_cmp(&b.value))
    }
}
