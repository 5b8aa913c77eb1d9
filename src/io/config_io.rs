use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::config::Config;

pub const CONFIG_FILE: &str = "pitstop.toml";
pub const CONFIG_ENV: &str = "PITSTOP_CONFIG";

/// Error type for reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Where configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` or `$PITSTOP_CONFIG`; the file must exist
    Required(PathBuf),
    /// `pitstop.toml` in the working directory, used if present
    Optional(PathBuf),
}

/// Pick the config file: the explicit path, then the environment
/// variable, then `pitstop.toml` under `cwd`.
pub fn config_source(explicit: Option<&Path>, env: Option<OsString>, cwd: &Path) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Required(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return ConfigSource::Required(PathBuf::from(path));
    }
    ConfigSource::Optional(cwd.join(CONFIG_FILE))
}

/// Read and parse one config file.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve and load configuration. Falls back to defaults when no file
/// is configured and none exists in the working directory.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    match config_source(explicit, std::env::var_os(CONFIG_ENV), cwd) {
        ConfigSource::Required(path) => read_config(&path),
        ConfigSource::Optional(path) => {
            if path.is_file() {
                read_config(&path)
            } else {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}

/// The effective configuration as TOML.
pub fn config_to_toml(config: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}
