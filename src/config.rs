//! Debugger configuration, loaded from an optional TOML file.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// How worker events are printed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebuggerConfig {
    /// Start paused, before the first keyword.
    pub stop_on_entry: bool,
    /// Fallback `tracing` filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub event_format: EventFormat,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            stop_on_entry: true,
            log_level: "warn".to_string(),
            event_format: EventFormat::Text,
        }
    }
}

impl DebuggerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
