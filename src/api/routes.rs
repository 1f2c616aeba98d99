use super::handlers::{health, metrics, runs};
use super::middleware::cors::add_cors;
use crate::services::{RunService, StatsService};
use axum::{
    Router,
    routing::{get, post},
};

#[derive(Clone)]
pub struct AppState {
    pub run_service: RunService,
    pub stats_service: StatsService,
}

pub fn create_router(run_service: RunService, stats_service: StatsService) -> Router {
    let state = AppState {
        run_service,
        stats_service,
    };

    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Runs
        .route("/api/builds", get(runs::list_builds))
        .route("/api/run", post(runs::start_run))
        .route("/api/logs/{run_id}", get(runs::get_log))
        .route("/api/jobs", get(runs::list_jobs))
        // Metrics and history
        .route("/api/stats", get(metrics::get_stats))
        .route("/api/history", get(metrics::list_history))
        .route("/api/history/download", get(metrics::download_history))
        .route("/api/reset", post(metrics::reset))
        .with_state(state);

    add_cors(api_routes)
}
