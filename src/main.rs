use pipewatch::api::create_router;
use pipewatch::catalog::PipelineCatalog;
use pipewatch::config::Config;
use pipewatch::services::{RunService, SnapshotStore, StatsService};
use pipewatch::simulator::StepSimulator;
use pipewatch::store::FileStore;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn run_server<F>(shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewatch=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting pipewatch with config: {:?}", config);

    // Open the data dir and seed the current-runs document
    let store = FileStore::open(config.data_dir.clone())?;
    tracing::info!("Data dir ready: {}", config.data_dir.display());

    // Freeze the catalog and wire up services
    let catalog = Arc::new(PipelineCatalog::builtin().with_overrides(config.catalog.clone()));
    let simulator = Arc::new(StepSimulator::new(catalog.clone(), config.seed));
    let snapshots = SnapshotStore::new(store.clone());

    let run_service = RunService::new(catalog, simulator, snapshots.clone(), store);
    let stats_service = StatsService::new(snapshots);

    // Create router
    let app = create_router(run_service, stats_service);
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let addr = addr.parse::<SocketAddr>()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_server(shutdown_signal()).await
}
