//! Revenue section data.

use serde::{Deserialize, Serialize};

use super::series::ValuePoint;

/// Revenue trend and segment breakdowns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueSection {
    /// Total revenue per month of last login, ascending.
    pub monthly_trend: Vec<ValuePoint>,
    /// Total revenue per device type.
    pub by_device: Vec<ValuePoint>,
    /// Mean revenue per preferred game mode.
    pub avg_by_game_mode: Vec<ValuePoint>,
}

impl RevenueSection {
    pub fn is_empty(&self) -> bool {
        self.monthly_trend.is_empty()
            && self.by_device.is_empty()
            && self.avg_by_game_mode.is_empty()
    }

    /// Sum of the device breakdown (every row lands in exactly one device bucket).
    pub fn device_total(&self) -> f64 {
        self.by_device.iter().map(|p| p.value).sum()
    }

    /// Device with the highest total revenue.
    pub fn top_device(&self) -> Option<&ValuePoint> {
        self.by_device
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
    }
}
