use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use super::interpolation::{
    interpolate_document,
    InterpolationError,
};
use super::schema::QuayhookConfig;

pub const CONFIG_PATH_ENV: &str = "QUAYHOOK_CONFIG_PATH";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Picks the config file: an explicit argument, then `QUAYHOOK_CONFIG_PATH`,
    /// then the user and system config directories, then the working directory.
    pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
        if let Some(path) = explicit {
            return path;
        }
        Self::discover_config_path()
    }

    pub fn discover_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!("Using config path from {}: {}", CONFIG_PATH_ENV, path);
            return PathBuf::from(path);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("quayhook").join(CONFIG_FILE_NAME);
            if path.exists() {
                tracing::debug!("Using user config path: {}", path.display());
                return path;
            }
        }

        let system = PathBuf::from("/etc/quayhook").join(CONFIG_FILE_NAME);
        if system.exists() {
            tracing::debug!("Using system config path: {}", system.display());
            return system;
        }

        let fallback = PathBuf::from(CONFIG_FILE_NAME);
        tracing::debug!("Using fallback config path: {}", fallback.display());
        fallback
    }

    pub fn load(path: &Path) -> ConfigLoadResult<QuayhookConfig> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ConfigLoadResult<QuayhookConfig> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_document(&mut value)?;

        let config: QuayhookConfig = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {}", e))
        })?;

        tracing::debug!(services = config.services.len(), "Parsed config");

        Ok(config)
    }
}
