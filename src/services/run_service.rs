use crate::catalog::{DEFAULT_JOB, PipelineCatalog};
use crate::error::Result;
use crate::models::Run;
use crate::services::engine;
use crate::services::snapshot::SnapshotStore;
use crate::simulator::StepSimulator;
use crate::store::FileStore;
use std::sync::Arc;

/// Owns run creation and the read surface over current runs, logs and
/// history. Each started run gets its own detached engine task; the caller
/// only ever waits for the initial snapshot.
#[derive(Clone)]
pub struct RunService {
    catalog: Arc<PipelineCatalog>,
    simulator: Arc<StepSimulator>,
    snapshots: SnapshotStore,
    store: FileStore,
}

impl RunService {
    pub fn new(
        catalog: Arc<PipelineCatalog>,
        simulator: Arc<StepSimulator>,
        snapshots: SnapshotStore,
        store: FileStore,
    ) -> Self {
        Self {
            catalog,
            simulator,
            snapshots,
            store,
        }
    }

    /// Creates a run for `job` (default job when absent, fallback steps when
    /// unknown), persists its initial snapshot, and spawns the engine task.
    /// Returns immediately with the created run.
    pub async fn start_run(&self, job: Option<String>) -> Result<Run> {
        let job = job
            .filter(|job| !job.is_empty())
            .unwrap_or_else(|| DEFAULT_JOB.to_string());
        let steps = self.catalog.steps_for(&job);
        let run = Run::new(job, steps);

        self.snapshots.upsert_current(&run).await?;
        tracing::info!("Run {} created for job {}", run.id, run.job);

        tokio::spawn(engine::drive(
            run.clone(),
            self.simulator.clone(),
            self.snapshots.clone(),
            self.store.clone(),
        ));

        Ok(run)
    }

    pub async fn list_current(&self) -> Vec<Run> {
        self.snapshots.read_current().await
    }

    pub fn get_log(&self, run_id: &str) -> String {
        self.store.read_log(run_id)
    }

    pub async fn history(&self) -> Vec<Run> {
        self.snapshots.read_history().await
    }

    /// Full history as one pretty-printed JSON document, for download.
    pub async fn export_history(&self) -> Result<String> {
        let history = self.snapshots.read_history().await;
        Ok(serde_json::to_string_pretty(&history)?)
    }

    /// Clears persisted state. Does not stop in-flight run tasks; a live run
    /// re-persists its snapshot and still lands in history afterwards.
    pub async fn reset(&self) -> Result<()> {
        self.snapshots.reset().await
    }

    pub fn jobs(&self) -> Vec<String> {
        self.catalog.jobs()
    }
}
