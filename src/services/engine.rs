use crate::models::{Run, RunStatus};
use crate::services::snapshot::SnapshotStore;
use crate::simulator::StepSimulator;
use crate::store::FileStore;
use chrono::Utc;
use std::sync::Arc;

/// Drives one run from its first step to a terminal state.
///
/// Steps execute strictly in order. The run fails on the first step whose
/// simulated roll comes up bad; remaining steps never execute. Every
/// externally visible mutation is followed by a snapshot persist, and the
/// terminal state is appended to history exactly once.
pub async fn drive(
    mut run: Run,
    simulator: Arc<StepSimulator>,
    snapshots: SnapshotStore,
    store: FileStore,
) {
    let started = tokio::time::Instant::now();
    log_line(
        &store,
        &run.id,
        &format!("Run {} started (job={})", run.id, run.job),
    );

    let steps = run.steps.clone();
    for step in &steps {
        run.current_step = Some(step.clone());
        persist(&snapshots, &run).await;

        log_line(&store, &run.id, &format!("Step '{}' started", step));

        let outcome = simulator.simulate(step);
        tokio::time::sleep(outcome.delay).await;

        log_line(&store, &run.id, &outcome.output);

        if outcome.failed {
            run.status = RunStatus::Failed;
            run.finished_at = Some(Utc::now());
            run.duration_s = Some(started.elapsed().as_secs());
            log_line(&store, &run.id, &format!("Step '{}' FAILED", step));
            log_line(
                &store,
                &run.id,
                &format!("Run {} finished with status=failed", run.id),
            );
            run.current_step = None;
            persist(&snapshots, &run).await;
            append(&snapshots, &run).await;
            tracing::info!("Run {} failed at step '{}'", run.id, step);
            return;
        }

        log_line(&store, &run.id, &format!("Step '{}' OK", step));
    }

    run.status = RunStatus::Success;
    run.finished_at = Some(Utc::now());
    run.duration_s = Some(started.elapsed().as_secs());
    run.current_step = None;
    log_line(
        &store,
        &run.id,
        &format!("Run {} finished with status=success", run.id),
    );
    persist(&snapshots, &run).await;
    append(&snapshots, &run).await;
    tracing::info!("Run {} succeeded", run.id);
}

// Persistence failures inside a detached run task have nowhere to surface;
// the run keeps going on its in-memory state.
async fn persist(snapshots: &SnapshotStore, run: &Run) {
    if let Err(e) = snapshots.upsert_current(run).await {
        tracing::warn!("Failed to persist snapshot for run {}: {}", run.id, e);
    }
}

async fn append(snapshots: &SnapshotStore, run: &Run) {
    if let Err(e) = snapshots.append_history(run).await {
        tracing::warn!("Failed to append history for run {}: {}", run.id, e);
    }
}

fn log_line(store: &FileStore, run_id: &str, message: &str) {
    let stamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    if let Err(e) = store.append_log(run_id, &format!("[{}] {}", stamp, message)) {
        tracing::warn!("Failed to append log for run {}: {}", run_id, e);
    }
}
