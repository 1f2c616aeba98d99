use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One simulated pipeline execution. Snapshots of this struct are what the
/// dashboard polls while the run is live, and what history keeps afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub job: String,
    pub status: RunStatus,
    pub steps: Vec<String>,
    pub current_step: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_s: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    Failed,
}

impl Run {
    pub fn new(job: String, steps: Vec<String>) -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);

        Self {
            id,
            job,
            status: RunStatus::Running,
            current_step: steps.first().cloned(),
            steps,
            started_at: Utc::now(),
            finished_at: None,
            duration_s: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != RunStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_starts_running_at_first_step() {
        let run = Run::new(
            "app-ci".to_string(),
            vec!["checkout".to_string(), "unit-tests".to_string()],
        );

        assert_eq!(run.id.len(), 8);
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.current_step.as_deref(), Some("checkout"));
        assert!(run.finished_at.is_none());
        assert!(run.duration_s.is_none());
        assert!(!run.is_terminal());
    }

    #[test]
    fn new_run_with_no_steps_has_no_current_step() {
        let run = Run::new("empty".to_string(), Vec::new());
        assert!(run.current_step.is_none());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&RunStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        let json = serde_json::to_string(&RunStatus::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
    }
}
