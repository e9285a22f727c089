//! CLI command implementations for `webrelay`.
//!
//! - [`serve`] -- Chat transport + HTTP relay endpoint.
//! - [`sign`] -- Signature helper for callers and debugging.
//! - [`config_cmd`] -- Resolved configuration display.

pub mod config_cmd;
pub mod serve;
pub mod sign;

use std::path::Path;

use webrelay_types::config::{Config, loader};

/// Load configuration from the given path override or via auto-discovery.
///
/// If `config_override` is provided, loads from that path. Otherwise,
/// uses the discovery chain:
/// 1. `WEBRELAY_CONFIG` env var
/// 2. `~/.webrelay/config.json`
///
/// Returns a default `Config` if no config file is found.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    if let Some(path) = config_override
        && !Path::new(path).exists()
    {
        anyhow::bail!("config file not found: {path}");
    }
    loader::load_config(config_override.map(Path::new))
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))
}
