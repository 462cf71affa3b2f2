use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::filter::Filter;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Current filter mode
    #[serde(default)]
    pub filter: Filter,
    /// Cursor index into the visible list
    #[serde(default)]
    pub cursor: usize,
}

/// Read .state.json from the data directory. Missing or malformed state is
/// simply absent — the TUI falls back to defaults.
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            filter: Filter::Completed,
            cursor: 3,
        };
        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded.filter, Filter::Completed);
        assert_eq!(loaded.cursor, 3);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.filter, Filter::All);
        assert_eq!(state.cursor, 0);
    }
}
