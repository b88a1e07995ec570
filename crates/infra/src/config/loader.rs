//! Configuration loader
//!
//! Loads client settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `GRIDSAVE_HOST`: Backend base URL
//! - `GRIDSAVE_ORG`: Organisation name
//! - `GRIDSAVE_APP`: Application name
//! - `GRIDSAVE_ID_PROPERTY`: Identifier field (optional, default `uuid`)
//! - `GRIDSAVE_TIMEOUT_MS`: Per-request timeout (optional, default 5000)
//! - `GRIDSAVE_GRANT_TYPE`: Grant type (optional, default `client_credentials`)
//! - `GRIDSAVE_CLIENT_ID`: Client identifier
//! - `GRIDSAVE_CLIENT_SECRET`: Client secret
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./gridsave.toml` or `./gridsave.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)

use std::path::{Path, PathBuf};

use gridsave_domain::constants::{DEFAULT_GRANT_TYPE, DEFAULT_ID_PROPERTY, DEFAULT_TIMEOUT_MS};
use gridsave_domain::{GridSaveError, GridSaveSettings, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["gridsave.toml", "gridsave.json", "config.toml", "config.json"];

/// Load settings with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `GridSaveError::Config` if:
/// - Settings cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<GridSaveSettings> {
    match load_from_env() {
        Ok(settings) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(settings)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load settings from environment variables
///
/// # Errors
/// Returns `GridSaveError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<GridSaveSettings> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Load settings from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
///
/// # Errors
/// Returns `GridSaveError::Config` if the file is missing, unreadable,
/// malformed, or lacks required fields.
pub fn load_from_file(path: Option<PathBuf>) -> Result<GridSaveSettings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GridSaveError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GridSaveError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GridSaveError::Config(format!("Failed to read config file: {e}")))?;

    parse_settings(&contents, &config_path)
}

/// First existing config file in the current working directory, if any.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_in(&cwd)
}

fn probe_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

fn parse_settings(contents: &str, path: &Path) -> Result<GridSaveSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GridSaveError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GridSaveError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(GridSaveError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn from_lookup<F>(lookup: F) -> Result<GridSaveSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| GridSaveError::Config(format!("Missing required environment variable: {key}")))
    };

    let timeout_ms = match lookup("GRIDSAVE_TIMEOUT_MS") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| GridSaveError::Config(format!("Invalid timeout: {e}")))?,
        None => DEFAULT_TIMEOUT_MS,
    };

    Ok(GridSaveSettings {
        host: required("GRIDSAVE_HOST")?,
        org: required("GRIDSAVE_ORG")?,
        app: required("GRIDSAVE_APP")?,
        id_property: lookup("GRIDSAVE_ID_PROPERTY").unwrap_or_else(|| DEFAULT_ID_PROPERTY.into()),
        timeout_ms,
        grant_type: lookup("GRIDSAVE_GRANT_TYPE").unwrap_or_else(|| DEFAULT_GRANT_TYPE.into()),
        client_id: required("GRIDSAVE_CLIENT_ID")?,
        client_secret: required("GRIDSAVE_CLIENT_SECRET")?,
    })
}
