//! Parley configuration system.
//!
//! Provides TOML-based configuration with validation and credential
//! resolution. All config sections use sensible defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use parley_config::{load_config, config_to_json};
//!
//! let (config, source) = load_config(None).expect("failed to load config");
//! println!("using {}", source.path().display());
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::{load_dotenv, resolve_api_key};
pub use schema::{LogLevel, ParleyConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::ConfigSource;

use parley_common::ConfigError;
use std::path::Path;

/// Load and validate the config.
///
/// With an explicit `path` the file must exist. Without one, `config.toml`
/// is read from the OS config directory and created with defaults if absent.
pub fn load_config(path: Option<&Path>) -> Result<(ParleyConfig, ConfigSource), ConfigError> {
    let (config, source) = match path {
        Some(path) => (
            toml_loader::load_from_path(path)?,
            ConfigSource::File(path.to_path_buf()),
        ),
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok((config, source))
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ParleyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
