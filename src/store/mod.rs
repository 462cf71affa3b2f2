//! The task store: the authoritative ordered task list and its on-disk
//! mirror. The full list is rewritten after every mutation; load happens
//! once at startup.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store_io::{self, LoadOutcome, PersistedTask};
use crate::model::task::{Task, TaskId};

pub use crate::io::store_io::StoreError;

pub struct TaskStore {
    dir: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Load the store from `<dir>/tasks.json`.
    ///
    /// A missing file yields an empty store. A file that exists but cannot
    /// be parsed yields an empty store too: the condition is logged, the raw
    /// contents are captured in the recovery log, and the file itself is
    /// left untouched until the next save overwrites it. Only I/O failures
    /// propagate as errors.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let path = store_io::tasks_path(dir);
        let records = match store_io::read_tasks(&path)? {
            LoadOutcome::Missing => Vec::new(),
            LoadOutcome::Parsed(records) => records,
            LoadOutcome::Malformed { raw, error } => {
                eprintln!(
                    "warning: {} is not a valid task list ({}); starting with an empty list",
                    path.display(),
                    error
                );
                recovery::log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Parser, "unreadable tasks file", raw),
                );
                Vec::new()
            }
        };

        let now = Utc::now();
        let tasks: Vec<Task> = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Task {
                id: TaskId(i as u64 + 1),
                name: record.name,
                completed: record.completed,
                created_at: record.created_at.unwrap_or(now),
            })
            .collect();
        let next_id = tasks.len() as u64 + 1;

        Ok(TaskStore {
            dir: dir.to_path_buf(),
            tasks,
            next_id,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The full list, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a new task. Blank input is a silent no-op: nothing is added
    /// and no save is triggered.
    pub fn add(&mut self, name: &str) -> Result<Option<TaskId>, StoreError> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task::new(id, name));
        self.save()?;
        Ok(Some(id))
    }

    /// Set a task's completion flag, then save.
    pub fn set_completed(&mut self, id: TaskId, value: bool) -> Result<(), StoreError> {
        let task = self.task_mut(id)?;
        task.completed = value;
        self.save()
    }

    /// Flip a task's completion flag. Returns the new value.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        let value = task.completed;
        self.save()?;
        Ok(value)
    }

    /// Change a task's name, then save. Blank names are accepted on this
    /// path — only `add` filters them.
    pub fn rename(&mut self, id: TaskId, new_name: &str) -> Result<(), StoreError> {
        let task = self.task_mut(id)?;
        task.name = new_name.to_string();
        self.save()
    }

    /// Remove a task, then save. The removed record is kept in the recovery
    /// log so an accidental delete is not final.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = self.tasks.remove(idx);

        let body = serde_json::to_string(&PersistedTask::from(&removed)).unwrap_or_default();
        recovery::log_recovery(
            &self.dir,
            RecoveryEntry::new(
                RecoveryCategory::Delete,
                format!("task \"{}\" deleted", removed.name),
                body,
            ),
        );

        self.save()?;
        Ok(removed)
    }

    /// Rewrite the backing file from the in-memory list. On failure the
    /// serialized list is captured in the recovery log before the error
    /// propagates.
    fn save(&self) -> Result<(), StoreError> {
        let path = store_io::tasks_path(&self.dir);
        match store_io::write_tasks(&path, &self.tasks) {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Ok(body) = store_io::render_tasks(&self.tasks) {
                    recovery::log_recovery(
                        &self.dir,
                        RecoveryEntry::new(RecoveryCategory::Write, "tasks write failed", body),
                    );
                }
                Err(e)
            }
        }
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}
