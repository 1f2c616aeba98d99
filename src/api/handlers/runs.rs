use crate::api::dto::run::{
    JobsResponse, LogResponse, RunResponse, RunsListResponse, StartRunRequest, StartRunResponse,
};
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
};

pub async fn list_builds(State(state): State<AppState>) -> Json<RunsListResponse> {
    let runs = state.run_service.list_current().await;
    Json(RunsListResponse {
        data: runs.into_iter().map(RunResponse::from).collect(),
    })
}

pub async fn start_run(
    State(state): State<AppState>,
    Json(req): Json<StartRunRequest>,
) -> Result<Json<StartRunResponse>> {
    let run = state.run_service.start_run(req.job).await?;
    Ok(Json(StartRunResponse {
        message: "started".to_string(),
        run_id: run.id,
    }))
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Json<LogResponse> {
    Json(LogResponse {
        log: state.run_service.get_log(&run_id),
    })
}

pub async fn list_jobs(State(state): State<AppState>) -> Json<JobsResponse> {
    Json(JobsResponse {
        data: state.run_service.jobs(),
    })
}
