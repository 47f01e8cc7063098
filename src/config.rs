use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Debugger settings, read from a JSON file with camelCase keys.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DebuggerConfig {
    pub debug_mode: bool,
    /// Function invoked once per tick.
    pub entry: String,
    pub ticks: u64,
    pub log_filter: String,
    pub default_steps: u32,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            debug_mode: true,
            entry: "main".to_string(),
            ticks: 1,
            log_filter: "info".to_string(),
            default_steps: 1,
        }
    }
}

impl DebuggerConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
