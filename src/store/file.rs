use crate::error::Result;
use crate::store::Doc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const LOGS_DIR: &str = "logs";

/// Flat-file document store: one JSON file per document plus an append-only
/// log file per run under `logs/`. Missing or unreadable documents are
/// treated as absent, never surfaced.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(root.join(LOGS_DIR))?;
        let store = Self { root };
        if !store.doc_path(Doc::CurrentRuns).exists() {
            store.save(Doc::CurrentRuns, &Vec::<serde_json::Value>::new())?;
        }
        Ok(store)
    }

    fn doc_path(&self, doc: Doc) -> PathBuf {
        self.root.join(doc.file_name())
    }

    // Run ids come in off the wire for log reads; anything that could walk
    // out of the logs dir maps to "no such stream".
    fn log_path(&self, run_id: &str) -> Option<PathBuf> {
        let valid = !run_id.is_empty()
            && run_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return None;
        }
        Some(self.root.join(LOGS_DIR).join(format!("{}.log", run_id)))
    }

    pub fn load<T: DeserializeOwned>(&self, doc: Doc, default: T) -> T {
        let path = self.doc_path(doc);
        let Ok(raw) = fs::read_to_string(&path) else {
            return default;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring corrupt document {}: {}", path.display(), e);
                default
            }
        }
    }

    pub fn save<T: Serialize>(&self, doc: Doc, value: &T) -> Result<()> {
        let payload = serde_json::to_string_pretty(value)?;
        fs::write(self.doc_path(doc), payload)?;
        Ok(())
    }

    pub fn append_log(&self, run_id: &str, line: &str) -> Result<()> {
        let Some(path) = self.log_path(run_id) else {
            return Ok(());
        };
        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line.trim_end())?;
        Ok(())
    }

    pub fn read_log(&self, run_id: &str) -> String {
        self.log_path(run_id)
            .and_then(|path| fs::read_to_string(path).ok())
            .unwrap_or_default()
    }

    /// Resets both documents to empty lists and removes every log stream.
    /// Individual log removals are best-effort.
    pub fn clear_all(&self) -> Result<()> {
        self.save(Doc::CurrentRuns, &Vec::<serde_json::Value>::new())?;
        self.save(Doc::History, &Vec::<serde_json::Value>::new())?;

        if let Ok(entries) = fs::read_dir(self.root.join(LOGS_DIR)) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("log") {
                    if let Err(e) = fs::remove_file(&path) {
                        tracing::warn!("Failed to remove log {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(())
    }
}
