use serde::{Deserialize, Serialize};

/// Rolling delivery metrics over run history.
///
/// Rates are percentages over the 7-day window, rounded to one decimal.
/// `mttr_minutes` pairs each failed run with the next successful run of the
/// same job inside the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub deploys_today: usize,
    pub success_rate: f64,
    pub change_failure_rate: f64,
    pub avg_duration_s: u64,
    pub mttr_minutes: u64,
}

impl DeliveryMetrics {
    pub fn zero() -> Self {
        Self {
            deploys_today: 0,
            success_rate: 0.0,
            change_failure_rate: 0.0,
            avg_duration_s: 0,
            mttr_minutes: 0,
        }
    }
}
