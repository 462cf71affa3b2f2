use std::fmt;

use chrono::{DateTime, Utc};

/// Stable handle for a task within a running store.
///
/// Ids are assigned monotonically at load/creation time and are never
/// persisted — the on-disk format identifies tasks by position only, so a
/// fresh set of ids is minted on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single todo entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// Display text. Blank names are rejected on add but not on rename.
    pub name: String,
    pub completed: bool,
    /// When the task was first created. Preserved across saves.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new incomplete task stamped with the current time.
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Task {
            id,
            name: name.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}
