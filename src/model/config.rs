use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from tally.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key-hint line in the TUI status row.
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides for the theme, e.g. `accent = "#7AA2F7"`.
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
