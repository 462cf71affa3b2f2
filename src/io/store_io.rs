use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::task::{Task, TaskId};

/// Name of the backing file inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// Error type for store I/O operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// One element of the persisted JSON array.
///
/// The wire format is `{"name", "completed", "created_at"}`; unknown fields
/// are ignored on read, and `completed`/`created_at` may be absent in files
/// written by older tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedTask {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Task> for PersistedTask {
    fn from(task: &Task) -> Self {
        PersistedTask {
            name: task.name.clone(),
            completed: task.completed,
            created_at: Some(task.created_at),
        }
    }
}

/// Outcome of reading the tasks file.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No file on disk yet — a fresh store.
    Missing,
    /// Parsed records in file order.
    Parsed(Vec<PersistedTask>),
    /// The file exists but is not a valid JSON task array. The raw contents
    /// are handed back so the caller can preserve them.
    Malformed { raw: String, error: String },
}

/// Path to the tasks file inside a data directory.
pub fn tasks_path(dir: &Path) -> PathBuf {
    dir.join(TASKS_FILE)
}

/// Read the tasks file. Only I/O failures are hard errors; a missing or
/// unparsable file is reported through [`LoadOutcome`].
pub fn read_tasks(path: &Path) -> Result<LoadOutcome, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
        Err(e) => {
            return Err(StoreError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    match serde_json::from_str::<Vec<PersistedTask>>(&raw) {
        Ok(records) => Ok(LoadOutcome::Parsed(records)),
        Err(e) => Ok(LoadOutcome::Malformed {
            raw,
            error: e.to_string(),
        }),
    }
}

/// Serialize the full task list as a pretty-printed JSON array.
pub fn render_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    let records: Vec<PersistedTask> = tasks.iter().map(PersistedTask::from).collect();
    serde_json::to_string_pretty(&records)
}

/// Write the full task list to the tasks file.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    let content = render_tasks(tasks)?;
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
