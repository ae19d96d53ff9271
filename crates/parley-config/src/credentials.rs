//! Provider credential resolution.
//!
//! The API key is never stored in the config file. It is read from the
//! environment variable named by `model.api_key_env`, optionally populated
//! from a `.env` file in the working directory.

use parley_common::ConfigError;
use std::path::PathBuf;

/// Load `.env` from the working directory (or a parent) if one exists.
///
/// Variables already set in the process environment take precedence.
/// Returns the path that was loaded, or `None` when there is no `.env`.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!("failed to read .env file: {e}"))),
    }
}

/// Resolve the API key from the process environment.
pub fn resolve_api_key(var: &str) -> Result<String, ConfigError> {
    resolve_api_key_with(var, |name| std::env::var(name).ok())
}

/// Resolve the API key using `lookup` in place of the process environment.
///
/// Unset, empty, and whitespace-only values are all treated as missing.
pub fn resolve_api_key_with(
    var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingCredential(var.to_string()))
}
