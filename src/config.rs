//! Terminal configuration.
//!
//! Defaults cover everything; a YAML file named by `COMMAND_TERMINAL_CONFIG`
//! may override any subset, and `COMMAND_TERMINAL_STORE` overrides the node
//! store path. A `.env` file is honoured when present.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use terminal_input::InputConfig;
use terminal_physics::PhysicsConfig;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "COMMAND_TERMINAL_CONFIG";
pub const STORE_ENV: &str = "COMMAND_TERMINAL_STORE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub physics: PhysicsConfig,
    pub input: InputConfig,
    pub dispatch: DispatchConfig,
    pub storage: StorageConfig,
}

/// Activation pacing and the external search destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Delay between the feedback hop and opening the destination (ms).
    pub feedback_delay_ms: u64,

    /// Base url of the SEARCH mode destination
    pub search_url: String,

    /// Query parameter the search text is appended under
    pub search_param: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 800,
            search_url: "https://www.google.com/search".to_string(),
            search_param: "q".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the persisted node set
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/command-terminal-nodes.json"),
        }
    }
}

impl TerminalConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: TerminalConfig = serde_yaml::from_str(yaml)?;
        config.input.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from the environment: `.env`, then the optional YAML file, then
    /// the store path override.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }

        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if Path::new(&path).exists() => {
                info!(%path, "loading terminal config");
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };

        if let Ok(store) = std::env::var(STORE_ENV) {
            config.storage.path = PathBuf::from(store);
        }
        Ok(config)
    }
}
