//! Gateway configuration
//!
//! Values come from built-in defaults, an optional TOML file and
//! `SEARCHGATE_*` environment variables, in increasing precedence.

mod defaults;
mod loading;


use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use defaults::*;

/// Get the global config file path (~/.searchgate/config.toml)
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".searchgate").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Search engine connection and launch configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Write queue and drain worker configuration
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Configuration for the search engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed base URL of the engine's REST API
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_engine_timeout_secs")]
    pub timeout_secs: u64,

    /// Launch the engine process at startup
    #[serde(default = "default_auto_launch")]
    pub auto_launch: bool,

    /// Program run by the launch step
    #[serde(default = "default_launch_command")]
    pub launch_command: String,
}

/// Configuration for the write queue and its drain worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of pending save batches
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,

    /// Delay after each persist attempt, in milliseconds
    #[serde(default = "default_queue_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_secs: default_engine_timeout_secs(),
            auto_launch: default_auto_launch(),
            launch_command: default_launch_command(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
            pacing_ms: default_queue_pacing_ms(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl QueueConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::config("server.host must not be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(Error::config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        let url = self.engine.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::config(format!(
                "Invalid engine.url '{}': must start with http:// or https://",
                self.engine.url
            )));
        }

        if self.engine.timeout_secs == 0 {
            return Err(Error::config(
                "engine.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.engine.auto_launch && self.engine.launch_command.trim().is_empty() {
            return Err(Error::config(
                "engine.launch_command must be set when engine.auto_launch is enabled"
                    .to_string(),
            ));
        }

        if self.queue.capacity == 0 {
            return Err(Error::config(
                "queue.capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_string)
            .context(format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }
}
