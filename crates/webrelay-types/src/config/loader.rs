//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. An explicit path (the `--config` flag).
//! 2. `WEBRELAY_CONFIG` environment variable.
//! 3. `~/.webrelay/config.json`
//! 4. If none found, the defaults (relay disabled).
//!
//! JSON keys are normalized from camelCase to snake_case before
//! deserialization. After loading, `WEBRELAY_CLIENT_SECRET` (when set and
//! non-empty) replaces `relay.client_secret`.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::Config;
use crate::error::ConfigError;
use crate::secret::SharedSecret;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "WEBRELAY_CONFIG";

/// Environment variable that overrides the relay secret.
pub const SECRET_ENV: &str = "WEBRELAY_CLIENT_SECRET";

/// Discover the config file path using the fallback chain.
///
/// `get_var` looks up environment variables; it is a parameter so callers
/// (and tests) control the environment that is consulted.
pub fn discover_config_path(
    get_var: &dyn Fn(&str) -> Option<String>,
    home_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(env_path) = get_var(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }

    let candidate = home_dir?.join(".webrelay").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Load the configuration from the process environment.
pub fn load_config(config_override: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with(
        config_override,
        &|key| std::env::var(key).ok(),
        dirs::home_dir(),
    )
}

/// Load the configuration with an explicit environment and home directory.
///
/// An explicit `config_override` must exist. A discovered path that does not
/// exist falls back to defaults with a warning.
pub fn load_config_with(
    config_override: Option<&Path>,
    get_var: &dyn Fn(&str) -> Option<String>,
    home_dir: Option<PathBuf>,
) -> Result<Config, ConfigError> {
    let raw = match config_override {
        Some(path) => read_normalized(path)?,
        None => match discover_config_path(get_var, home_dir) {
            Some(path) if path.exists() => read_normalized(&path)?,
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "config path does not exist, using defaults"
                );
                Value::Object(serde_json::Map::new())
            }
            None => {
                tracing::info!("no config file found, using defaults");
                Value::Object(serde_json::Map::new())
            }
        },
    };

    let mut config: Config = serde_json::from_value(raw)?;
    apply_env_overrides(&mut config, get_var);
    config.validate()?;
    Ok(config)
}

/// Apply environment-variable overrides to a loaded config.
pub fn apply_env_overrides(config: &mut Config, get_var: &dyn Fn(&str) -> Option<String>) {
    if let Some(secret) = get_var(SECRET_ENV).filter(|s| !s.is_empty()) {
        tracing::debug!(var = SECRET_ENV, "relay secret supplied by environment");
        config.relay.client_secret = Some(SharedSecret::new(secret));
    }
}

fn read_normalized(path: &Path) -> Result<Value, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents)?;
    Ok(normalize_keys(value))
}

/// Convert camelCase JSON keys to snake_case recursively.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// A run of uppercase letters such as `"HTTP"` is kept together; an
/// underscore goes before the last capital when a lowercase letter follows.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}
