//! Churn section data.

use serde::{Deserialize, Serialize};

/// Single churned user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnRow {
    pub user_id: String,
    pub username: String,
    /// Last login, formatted.
    pub last_login: String,
    pub total_play_sessions: Option<i64>,
    pub total_revenue_usd: Option<f64>,
}

/// Users whose last login is older than the churn window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnSection {
    /// Inactivity window in days.
    pub threshold_days: i64,
    /// Most recent login in the filtered view.
    pub latest_login: Option<String>,
    /// Users with a last login before this are churned.
    pub cutoff: Option<String>,
    /// Churned rows (possibly truncated).
    pub users: Vec<ChurnRow>,
    /// Total churned rows (before limit).
    pub total_count: usize,
    /// Whether data was truncated.
    pub truncated: bool,
}

impl ChurnSection {
    /// Create a new churn section.
    pub fn new(
        threshold_days: i64,
        latest_login: Option<String>,
        cutoff: Option<String>,
        users: Vec<ChurnRow>,
        total_count: usize,
    ) -> Self {
        let truncated = users.len() < total_count;
        Self {
            threshold_days,
            latest_login,
            cutoff,
            users,
            total_count,
            truncated,
        }
    }

    /// An empty section (no computable cutoff).
    pub fn empty(threshold_days: i64) -> Self {
        Self::new(threshold_days, None, None, Vec::new(), 0)
    }

    /// Revenue at risk across the listed churned users.
    pub fn revenue_at_risk(&self) -> f64 {
        self.users.iter().filter_map(|u| u.total_revenue_usd).sum()
    }
}
