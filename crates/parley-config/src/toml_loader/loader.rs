//! Core TOML config loading: read from path or platform default.

use crate::schema::ParleyConfig;
use parley_common::ConfigError;
use std::path::{Path, PathBuf};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// Validation is left to the caller.
pub fn load_from_path(path: &Path) -> Result<ParleyConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: ParleyConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    Ok(config)
}

/// Where the effective config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file.
    File(PathBuf),
    /// The file was missing and a commented default was written.
    CreatedDefault(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::File(path) | ConfigSource::CreatedDefault(path) => path,
        }
    }
}

/// Load config from `path`, writing the default template there if it is absent.
pub fn load_or_create(path: &Path) -> Result<(ParleyConfig, ConfigSource), ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok((config, ConfigSource::File(path.to_path_buf()))),
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(path)?;
            Ok((
                ParleyConfig::default(),
                ConfigSource::CreatedDefault(path.to_path_buf()),
            ))
        }
        Err(e) => Err(e),
    }
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/parley/config.toml`
/// On Linux: `~/.config/parley/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<(ParleyConfig, ConfigSource), ConfigError> {
    load_or_create(&default_config_path()?)
}
