use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use super::interpolation::{
    interpolate_toml,
    InterpolationError,
};
use super::schema::CourtsideConfig;
use crate::domain::CoreError;

pub const CONFIG_PATH_ENV: &str = "COURTSIDE_CONFIG_PATH";
pub const DEFAULT_CONFIG_FILE: &str = "courtside.toml";

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

impl From<ConfigLoadError> for CoreError {
    fn from(err: ConfigLoadError) -> Self {
        CoreError::InvalidConfig(err.to_string())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// `COURTSIDE_CONFIG_PATH` when set, else `./courtside.toml` if present
    pub fn discover_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!(path = %path, "Using config path from {}", CONFIG_PATH_ENV);
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            tracing::debug!(path = %local.display(), "Using config file in working directory");
            return Some(local);
        }

        None
    }

    /// Discovered file, or built-in defaults when there is none. An explicit
    /// `COURTSIDE_CONFIG_PATH` that does not exist is an error.
    pub fn load_default() -> ConfigLoadResult<CourtsideConfig> {
        match Self::discover_config_path() {
            Some(path) => Self::load(&path),
            None => {
                tracing::info!("No config file found, using built-in defaults");
                Ok(CourtsideConfig::default())
            }
        }
    }

    pub fn load(path: &Path) -> ConfigLoadResult<CourtsideConfig> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), sources = config.sources.len(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> ConfigLoadResult<CourtsideConfig> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_toml(&mut value)?;

        let config: CourtsideConfig = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {e}"))
        })?;

        config.validate().map_err(ConfigLoadError::InvalidConfig)?;

        Ok(config)
    }

    pub fn to_toml(config: &CourtsideConfig) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(config)
    }
}
