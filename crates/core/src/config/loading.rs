//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    /// Environment variables are prefixed with `SEARCHGATE_` and use double
    /// underscores for nested values. For example:
    /// - `SEARCHGATE_QUEUE__CAPACITY=50`
    /// - `SEARCHGATE_ENGINE__URL=http://es:9200`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // The config crate doesn't apply serde defaults for missing sections
        let builder = set_config_default(builder, "server.host", default_server_host())?;
        let builder =
            set_config_default(builder, "server.port", i64::from(default_server_port()))?;
        let builder = set_config_default(builder, "engine.url", default_engine_url())?;
        let builder = set_config_default(
            builder,
            "engine.timeout_secs",
            default_engine_timeout_secs() as i64,
        )?;
        let builder = set_config_default(builder, "engine.auto_launch", default_auto_launch())?;
        let builder =
            set_config_default(builder, "engine.launch_command", default_launch_command())?;
        let builder = set_config_default(
            builder,
            "queue.capacity",
            default_queue_capacity() as i64,
        )?;
        let mut builder = set_config_default(
            builder,
            "queue.pacing_ms",
            default_queue_pacing_ms() as i64,
        )?;

        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        } else {
            debug!("No config file at {}, using defaults", path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix("SEARCHGATE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.searchgate/config.toml or custom --config path)
    /// 3. Environment variables (SEARCHGATE_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
