use crate::api::dto::run::{RunResponse, RunsListResponse};
use crate::api::routes::AppState;
use crate::error::Result;
use crate::models::DeliveryMetrics;
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

pub async fn get_stats(State(state): State<AppState>) -> Json<DeliveryMetrics> {
    Json(state.stats_service.delivery_metrics().await)
}

pub async fn list_history(State(state): State<AppState>) -> Json<RunsListResponse> {
    let history = state.run_service.history().await;
    Json(RunsListResponse {
        data: history.into_iter().map(RunResponse::from).collect(),
    })
}

pub async fn download_history(State(state): State<AppState>) -> Result<Response> {
    let payload = state.run_service.export_history().await?;
    let headers = [
        (header::CONTENT_TYPE, "application/json"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"history.json\"",
        ),
    ];
    Ok((headers, payload).into_response())
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    state.run_service.reset().await?;
    Ok(Json(serde_json::json!({
        "message": "reset done"
    })))
}
