//! Top users section data.

use serde::{Deserialize, Serialize};

/// Single high-value user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUserRow {
    pub user_id: String,
    pub username: String,
    pub total_revenue_usd: Option<f64>,
    pub total_hours_played: Option<f64>,
    pub in_game_purchases_count: Option<i64>,
    pub preferred_game_mode: String,
}

impl TopUserRow {
    /// Revenue per hour played, when both are known and hours are positive.
    pub fn revenue_per_hour(&self) -> Option<f64> {
        match (self.total_revenue_usd, self.total_hours_played) {
            (Some(rev), Some(hours)) if hours > 0.0 => Some(rev / hours),
            _ => None,
        }
    }
}

/// Highest revenue users, descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUsersSection {
    /// Requested row count.
    pub limit: usize,
    pub users: Vec<TopUserRow>,
}

impl TopUsersSection {
    pub fn new(limit: usize, users: Vec<TopUserRow>) -> Self {
        Self { limit, users }
    }
}
