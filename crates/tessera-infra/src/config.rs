//! Orchestrator configuration loader.
//!
//! Reads an optional `config.toml` and deserializes it into
//! [`OrchestratorConfig`]. A missing file yields the defaults; a file that
//! exists but cannot be read or parsed is an error, so a typo never silently
//! reverts the process to defaults.

use std::path::Path;

use tessera_types::config::OrchestratorConfig;
use tessera_types::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when `None`.
pub async fn load_config(path: Option<&Path>) -> Result<OrchestratorConfig, ConfigError> {
    let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(OrchestratorConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<OrchestratorConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        reason: err.to_string(),
    })?;

    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}
