use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryCategory {
    /// The tasks file could not be parsed; `body` holds its raw contents.
    Parser,
    /// A save failed; `body` holds the serialized list that was lost.
    Write,
    /// A task was deleted; `body` holds its persisted record.
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

/// A single entry in the recovery log, stored as one JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    /// Data that would otherwise have been lost.
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>, body: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            body,
        }
    }
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(dir: &Path) -> PathBuf {
    dir.join(".recovery.jsonl")
}

/// Append a recovery entry to the log. Errors are swallowed and printed to
/// stderr — the log must never turn a recoverable condition into a crash.
pub fn log_recovery(dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(dir, &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(dir);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    let line = serde_json::to_string(entry)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Read recovery entries, most recent first. Lines that fail to parse are
/// skipped. A missing log yields an empty list.
pub fn read_recovery_entries(dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let path = recovery_log_path(dir);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries: Vec<RecoveryEntry> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

/// Prune entries from the recovery log. With `all`, every entry is removed;
/// otherwise entries older than `before` (default: 30 days ago) go.
/// Returns the number of entries removed.
pub fn prune_recovery(
    dir: &Path,
    before: Option<DateTime<Utc>>,
    all: bool,
) -> io::Result<usize> {
    let path = recovery_log_path(dir);
    if !path.exists() {
        return Ok(0);
    }

    let content = std::fs::read_to_string(&path)?;
    let entries: Vec<RecoveryEntry> = content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    let original_count = entries.len();

    let kept: Vec<&RecoveryEntry> = if all {
        Vec::new()
    } else {
        let cutoff = before.unwrap_or_else(|| Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS));
        entries.iter().filter(|e| e.timestamp >= cutoff).collect()
    };

    let mut out = String::new();
    for entry in &kept {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    std::fs::write(&path, out)?;

    Ok(original_count - kept.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_entry(category: RecoveryCategory, desc: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry::new(category, desc, body.to_string())
    }

    #[test]
    fn log_and_read_most_recent_first() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Parser, "first", "a"));
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Delete, "second", "b"));

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "second");
        assert_eq!(entries[1].description, "first");
    }

    #[test]
    fn read_with_limit() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            log_recovery(
                tmp.path(),
                make_entry(RecoveryCategory::Delete, &format!("entry{}", i), ""),
            );
        }
        let entries = read_recovery_entries(tmp.path(), Some(2));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "entry4");
        assert_eq!(entries[1].description, "entry3");
    }

    #[test]
    fn read_missing_log_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Parser, "ok", ""));
        let path = recovery_log_path(tmp.path());
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("this is not json\n");
        std::fs::write(&path, content).unwrap();

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "ok");
    }

    #[test]
    fn prune_all() {
        let tmp = TempDir::new().unwrap();
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Write, "x", "body"));
        let removed = prune_recovery(tmp.path(), None, true).unwrap();
        assert_eq!(removed, 1);
        assert!(read_recovery_entries(tmp.path(), None).is_empty());
    }

    #[test]
    fn prune_before_cutoff_keeps_recent_entries() {
        let tmp = TempDir::new().unwrap();
        let mut old = make_entry(RecoveryCategory::Parser, "old", "");
        old.timestamp = Utc::now() - chrono::Duration::days(60);
        log_recovery(tmp.path(), old);
        log_recovery(tmp.path(), make_entry(RecoveryCategory::Write, "new", ""));

        let removed = prune_recovery(tmp.path(), None, false).unwrap();
        assert_eq!(removed, 1);

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "new");
    }

    #[test]
    fn prune_with_no_log_returns_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prune_recovery(tmp.path(), None, true).unwrap(), 0);
    }

    #[test]
    fn entry_round_trips_through_json() {
        let entry = make_entry(RecoveryCategory::Delete, "task deleted", "{\"name\":\"A\"}");
        let line = serde_json::to_string(&entry).unwrap();
        let parsed: RecoveryEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.category, RecoveryCategory::Delete);
        assert_eq!(parsed.description, "task deleted");
        assert_eq!(parsed.body, entry.body);
    }

    #[test]
    fn category_display() {
        assert_eq!(RecoveryCategory::Parser.to_string(), "parser");
        assert_eq!(RecoveryCategory::Write.to_string(), "write");
        assert_eq!(RecoveryCategory::Delete.to_string(), "delete");
    }
}
