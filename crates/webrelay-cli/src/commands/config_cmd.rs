//! `webrelay config` -- display resolved configuration.
//!
//! # Examples
//!
//! ```text
//! webrelay config show
//! webrelay config show --config /etc/webrelay.json
//! ```

use webrelay_types::config::Config;

/// Render the resolved configuration as pretty JSON.
///
/// The relay secret serializes as an empty string, so the output is safe
/// to paste into bug reports.
pub fn render(config: &Config) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Display the resolved configuration as formatted JSON.
pub fn config_show(config: &Config) -> anyhow::Result<()> {
    println!("{}", render(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrelay_types::secret::SharedSecret;

    #[test]
    fn render_contains_every_section() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&Config::default()).unwrap()).unwrap();
        assert!(json.get("relay").is_some());
        assert!(json.get("irc").is_some());
        assert!(json.get("server").is_some());
    }

    #[test]
    fn render_redacts_secret() {
        let mut config = Config::default();
        config.relay.client_secret = Some(SharedSecret::new("hunter2"));
        let out = render(&config).unwrap();
        assert!(!out.contains("hunter2"));
    }
}
