use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// Position in the full list as shown by `ty list` (1-based)
    pub position: usize,
    pub name: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

pub fn task_to_json(position: usize, task: &Task) -> TaskJson {
    TaskJson {
        position,
        name: task.name.clone(),
        completed: task.completed,
        created_at: task.created_at,
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One list line: `3 [x] Call mom`. Positions refer to the full list, so a
/// filtered listing keeps the numbers a later `ty done 3` expects.
pub fn format_task_line(position: usize, task: &Task) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    format!("{} {} {}", position, checkbox, task.name)
}

/// Render a `(position, task)` listing as text, one task per line.
pub fn format_task_list(entries: &[(usize, &Task)]) -> String {
    entries
        .iter()
        .map(|(position, task)| format_task_line(*position, task))
        .collect::<Vec<_>>()
        .join("\n")
}
