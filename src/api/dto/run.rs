use crate::models::{Run, RunStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct StartRunRequest {
    pub job: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartRunResponse {
    pub message: String,
    pub run_id: String,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub log: String,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub data: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub id: String,
    pub job: String,
    pub status: RunStatus,
    pub steps: Vec<String>,
    pub current_step: Option<String>,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_s: Option<u64>,
}

impl From<Run> for RunResponse {
    fn from(run: Run) -> Self {
        Self {
            id: run.id,
            job: run.job,
            status: run.status,
            steps: run.steps,
            current_step: run.current_step,
            started_at: run.started_at.to_rfc3339(),
            finished_at: run.finished_at.map(|t| t.to_rfc3339()),
            duration_s: run.duration_s,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunsListResponse {
    pub data: Vec<RunResponse>,
}
