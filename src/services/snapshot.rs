use crate::error::Result;
use crate::models::Run;
use crate::store::{Doc, FileStore};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CURRENT_RUNS_CAP: usize = 100;

/// Serialized accessor for the two shared documents. Every engine task and
/// every handler goes through the same mutex, so a read-modify-write cycle
/// against the current-runs list or history is never interleaved with
/// another writer. The lock is only held for the document update itself,
/// never across a step delay.
#[derive(Clone)]
pub struct SnapshotStore {
    store: FileStore,
    guard: Arc<Mutex<()>>,
}

impl SnapshotStore {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Replaces any prior snapshot of the same run, moves it to the front,
    /// and truncates the list to its cap.
    pub async fn upsert_current(&self, run: &Run) -> Result<()> {
        let _guard = self.guard.lock().await;
        let mut current: Vec<Run> = self.store.load(Doc::CurrentRuns, Vec::new());
        current.retain(|r| r.id != run.id);
        current.insert(0, run.clone());
        current.truncate(CURRENT_RUNS_CAP);
        self.store.save(Doc::CurrentRuns, &current)
    }

    pub async fn append_history(&self, run: &Run) -> Result<()> {
        let _guard = self.guard.lock().await;
        let mut history: Vec<Run> = self.store.load(Doc::History, Vec::new());
        history.push(run.clone());
        self.store.save(Doc::History, &history)
    }

    pub async fn read_current(&self) -> Vec<Run> {
        let _guard = self.guard.lock().await;
        self.store.load(Doc::CurrentRuns, Vec::new())
    }

    pub async fn read_history(&self) -> Vec<Run> {
        let _guard = self.guard.lock().await;
        self.store.load(Doc::History, Vec::new())
    }

    pub async fn reset(&self) -> Result<()> {
        let _guard = self.guard.lock().await;
        self.store.clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunStatus;

    fn snapshots() -> (tempfile::TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).unwrap();
        (dir, SnapshotStore::new(store))
    }

    fn run(id: &str) -> Run {
        let mut run = Run::new("app-ci".to_string(), vec!["checkout".to_string()]);
        run.id = id.to_string();
        run
    }

    #[tokio::test]
    async fn upsert_is_most_recent_first() {
        let (_dir, snapshots) = snapshots();
        snapshots.upsert_current(&run("a")).await.unwrap();
        snapshots.upsert_current(&run("b")).await.unwrap();

        let current = snapshots.read_current().await;
        let ids: Vec<&str> = current.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn upsert_replaces_same_id_and_moves_to_front() {
        let (_dir, snapshots) = snapshots();
        snapshots.upsert_current(&run("a")).await.unwrap();
        snapshots.upsert_current(&run("b")).await.unwrap();

        let mut updated = run("a");
        updated.status = RunStatus::Success;
        snapshots.upsert_current(&updated).await.unwrap();

        let current = snapshots.read_current().await;
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].id, "a");
        assert_eq!(current[0].status, RunStatus::Success);
        assert_eq!(current[1].id, "b");
    }

    #[tokio::test]
    async fn current_list_is_capped() {
        let (_dir, snapshots) = snapshots();
        for i in 0..CURRENT_RUNS_CAP + 20 {
            snapshots.upsert_current(&run(&format!("run-{}", i))).await.unwrap();
        }

        let current = snapshots.read_current().await;
        assert_eq!(current.len(), CURRENT_RUNS_CAP);
        // Newest survives, oldest got evicted.
        assert_eq!(current[0].id, format!("run-{}", CURRENT_RUNS_CAP + 19));
        assert!(!current.iter().any(|r| r.id == "run-0"));
    }

    #[tokio::test]
    async fn history_appends_in_order() {
        let (_dir, snapshots) = snapshots();
        snapshots.append_history(&run("a")).await.unwrap();
        snapshots.append_history(&run("b")).await.unwrap();

        let history = snapshots.read_history().await;
        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn concurrent_upserts_lose_no_entries() {
        let (_dir, snapshots) = snapshots();

        let mut handles = Vec::new();
        for i in 0..20 {
            let snapshots = snapshots.clone();
            handles.push(tokio::spawn(async move {
                snapshots.upsert_current(&run(&format!("run-{}", i))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(snapshots.read_current().await.len(), 20);
    }

    #[tokio::test]
    async fn reset_clears_both_documents() {
        let (_dir, snapshots) = snapshots();
        snapshots.upsert_current(&run("a")).await.unwrap();
        snapshots.append_history(&run("a")).await.unwrap();

        snapshots.reset().await.unwrap();

        assert!(snapshots.read_current().await.is_empty());
        assert!(snapshots.read_history().await.is_empty());
    }
}
