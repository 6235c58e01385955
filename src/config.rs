//! Process configuration from environment variables.

use crate::logic::{DEFAULT_TOP_DEBATERS, DEFAULT_TOP_TEAMS};
use crate::storage::StorageConfig;

/// Settings for the web binary. Unset or unparseable variables fall back to defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// `HOST`
    pub host: String,
    /// `PORT`
    pub port: u16,
    /// `DEBATE_TAB_DATA_DIR`
    pub data_dir: String,
    /// `DEBATE_TAB_TOP_TEAMS`
    pub top_teams: usize,
    /// `DEBATE_TAB_TOP_DEBATERS`
    pub top_debaters: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: "./data".to_string(),
            top_teams: DEFAULT_TOP_TEAMS,
            top_debaters: DEFAULT_TOP_DEBATERS,
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            data_dir: lookup("DEBATE_TAB_DATA_DIR")
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(defaults.data_dir),
            top_teams: parsed(&lookup, "DEBATE_TAB_TOP_TEAMS").unwrap_or(defaults.top_teams),
            top_debaters: parsed(&lookup, "DEBATE_TAB_TOP_DEBATERS").unwrap_or(defaults.top_debaters),
        }
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(&self.data_dir)
    }
}
