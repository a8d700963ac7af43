//! Configuration loader
//!
//! Loads [`ClientSettings`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `FEEDLINK_REGION` is set, settings come from the environment and
//!    any invalid value is an error
//! 2. Otherwise falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `FEEDLINK_REGION`: `us`, `europe`, `europe-west2` or `asia-southeast1`
//! - `FEEDLINK_USER_AGENT`: User-Agent header value
//! - `FEEDLINK_REQUEST_ATTEMPTS`: attempts per request, initial try included
//! - `FEEDLINK_REQUEST_TIMEOUT_SECS`: per-attempt timeout in seconds
//! - `FEEDLINK_RETRY_MODE`: `blind` or `transient_only`
//!
//! Unset optional variables keep their defaults.
//!
//! ## File Locations
//! The loader probes `feedlink.json` and `feedlink.toml` in the current
//! working directory and up to two parents, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use feedlink_domain::{ApiError, ClientSettings, Region, Result, RetryMode};

pub const ENV_REGION: &str = "FEEDLINK_REGION";
pub const ENV_USER_AGENT: &str = "FEEDLINK_USER_AGENT";
pub const ENV_REQUEST_ATTEMPTS: &str = "FEEDLINK_REQUEST_ATTEMPTS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "FEEDLINK_REQUEST_TIMEOUT_SECS";
pub const ENV_RETRY_MODE: &str = "FEEDLINK_RETRY_MODE";

const FILE_NAMES: [&str; 2] = ["feedlink.json", "feedlink.toml"];

/// Load settings with automatic fallback strategy
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - an environment variable holds an invalid value
/// - no config file is found when the environment is not used
/// - the file format is invalid
/// - the loaded settings fail validation
pub fn load() -> Result<ClientSettings> {
    if std::env::var_os(ENV_REGION).is_some() {
        let settings = load_from_env()?;
        tracing::info!(region = %settings.region, "Configuration loaded from environment");
        return Ok(settings);
    }

    tracing::debug!("{ENV_REGION} not set, trying file");
    load_from_file(None)
}

/// Load settings from environment variables
///
/// `FEEDLINK_REGION` is required; the rest are optional.
///
/// # Errors
/// Returns `ApiError::Config` if the region is missing or any variable
/// has an invalid value.
pub fn load_from_env() -> Result<ClientSettings> {
    let region = env_parse::<Region>(ENV_REGION)?;
    let mut settings = ClientSettings { region, ..Default::default() };

    if let Some(agent) = env_opt(ENV_USER_AGENT) {
        settings.user_agent = agent;
    }
    if let Some(raw) = env_opt(ENV_REQUEST_ATTEMPTS) {
        settings.request_attempts = parse_attempts(&raw)?;
    }
    if let Some(raw) = env_opt(ENV_REQUEST_TIMEOUT_SECS) {
        settings.request_timeout_secs = raw.trim().parse::<u64>().map_err(|e| {
            ApiError::Config(format!("Invalid {ENV_REQUEST_TIMEOUT_SECS} `{raw}`: {e}"))
        })?;
    }
    if env_opt(ENV_RETRY_MODE).is_some() {
        settings.retry_mode = env_parse::<RetryMode>(ENV_RETRY_MODE)?;
    }

    settings.validate()?;
    Ok(settings)
}

/// Load settings from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The settings fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientSettings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ApiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ApiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ApiError::Config(format!("Failed to read config file: {e}")))?;

    let settings = parse_config(&contents, &config_path)?;
    settings.validate()?;
    Ok(settings)
}

/// Parse settings from string content, format chosen by extension
///
/// Missing fields take their defaults.
///
/// # Errors
/// Returns `ApiError::Config` if the format is unsupported or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<ClientSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ApiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a settings file
///
/// Searches the current working directory and two parents, then the
/// executable's directory.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Attempts must be a positive integer; negative input is rejected, not wrapped
fn parse_attempts(raw: &str) -> Result<u32> {
    let value = raw.trim().parse::<i64>().map_err(|e| {
        ApiError::Config(format!("Invalid {ENV_REQUEST_ATTEMPTS} `{raw}`: {e}"))
    })?;
    if value <= 0 {
        return Err(ApiError::Config(format!(
            "{ENV_REQUEST_ATTEMPTS} must be positive, got {value}"
        )));
    }
    u32::try_from(value)
        .map_err(|_| ApiError::Config(format!("{ENV_REQUEST_ATTEMPTS} {value} is too large")))
}

/// Get an environment variable, treating blank values as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse a required environment variable
///
/// # Errors
/// Returns `ApiError::Config` if the variable is missing or unparseable.
fn env_parse<T>(key: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    let raw = env_opt(key).ok_or_else(|| {
        ApiError::Config(format!("Missing required environment variable: {key}"))
    })?;
    raw.trim().parse::<T>().map_err(|e| ApiError::Config(format!("Invalid {key}: {e}")))
}
