use crate::models::{DeliveryMetrics, Run, RunStatus};
use crate::services::snapshot::SnapshotStore;
use chrono::{DateTime, Duration, Utc};

#[derive(Clone)]
pub struct StatsService {
    snapshots: SnapshotStore,
}

impl StatsService {
    pub fn new(snapshots: SnapshotStore) -> Self {
        Self { snapshots }
    }

    pub async fn delivery_metrics(&self) -> DeliveryMetrics {
        let history = self.snapshots.read_history().await;
        compute(&history, Utc::now())
    }
}

/// Metrics over run history, relative to `now`.
///
/// The window is every finished run with `now - finished_at <= 7 days`.
/// Rates are percentages of the window, rounded to one decimal. MTTR pairs
/// each windowed failure with the earliest later windowed success of the
/// same job; failures that never recovered contribute nothing.
pub fn compute(history: &[Run], now: DateTime<Utc>) -> DeliveryMetrics {
    if history.is_empty() {
        return DeliveryMetrics::zero();
    }

    let finished: Vec<&Run> = history.iter().filter(|r| r.finished_at.is_some()).collect();

    let deploys_today = finished
        .iter()
        .filter(|r| {
            r.finished_at
                .is_some_and(|t| t.date_naive() == now.date_naive())
        })
        .count();

    let window: Vec<&Run> = finished
        .iter()
        .copied()
        .filter(|r| {
            r.finished_at
                .is_some_and(|t| now.signed_duration_since(t) <= Duration::days(7))
        })
        .collect();

    let total = window.len();
    let successes = window
        .iter()
        .filter(|r| r.status == RunStatus::Success)
        .count();
    let failures = window
        .iter()
        .filter(|r| r.status == RunStatus::Failed)
        .count();

    let (success_rate, change_failure_rate) = if total > 0 {
        (
            round1(successes as f64 / total as f64 * 100.0),
            round1(failures as f64 / total as f64 * 100.0),
        )
    } else {
        (0.0, 0.0)
    };

    let durations: Vec<u64> = window.iter().filter_map(|r| r.duration_s).collect();
    let avg_duration_s = if durations.is_empty() {
        0
    } else {
        durations.iter().sum::<u64>() / durations.len() as u64
    };

    let mut recoveries: Vec<f64> = Vec::new();
    for failed in window.iter().filter(|r| r.status == RunStatus::Failed) {
        let Some(t_fail) = failed.finished_at else {
            continue;
        };
        let recovered_at = window
            .iter()
            .filter(|r| r.job == failed.job && r.status == RunStatus::Success)
            .filter_map(|r| r.finished_at)
            .filter(|t| *t > t_fail)
            .min();
        if let Some(t_success) = recovered_at {
            recoveries.push((t_success - t_fail).num_seconds() as f64 / 60.0);
        }
    }
    let mttr_minutes = if recoveries.is_empty() {
        0
    } else {
        (recoveries.iter().sum::<f64>() / recoveries.len() as f64) as u64
    };

    DeliveryMetrics {
        deploys_today,
        success_rate,
        change_failure_rate,
        avg_duration_s,
        mttr_minutes,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
