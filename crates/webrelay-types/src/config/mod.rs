//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`. Unknown fields are silently ignored.
//!
//! # Module Structure
//!
//! - [`color`] -- The named colour palette used to style relayed lines
//! - [`irc`] -- IRC connection settings and validation
//! - [`loader`] -- Config file discovery and loading

pub mod color;
pub mod irc;
#[cfg(feature = "native")]
pub mod loader;

pub use color::Color;
pub use irc::IrcConfig;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::secret::SharedSecret;

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for webrelay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Relay endpoint settings (shared secret, formatting).
    #[serde(default)]
    pub relay: RelayConfig,

    /// IRC connection settings.
    #[serde(default)]
    pub irc: IrcConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Validate every section.
    ///
    /// The IRC section is only checked when a server is set, so a config
    /// that merely exercises the HTTP side (e.g. `serve --dry-run`) still
    /// validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.relay.validate()?;
        if !self.irc.server.is_empty() {
            irc::validate_config(&self.irc).map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }
}

// ── Relay ────────────────────────────────────────────────────────────────

/// Settings for the `POST /relay/{channel}` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Shared secret keying the request MAC.
    ///
    /// When absent or empty the relay endpoint is never registered.
    #[serde(default, alias = "clientSecret")]
    pub client_secret: Option<SharedSecret>,

    /// Source label shown in front of every relayed message.
    #[serde(default = "default_label")]
    pub label: String,

    /// Colour of the source label.
    #[serde(default = "default_label_color", alias = "labelColor")]
    pub label_color: Color,

    /// Colour of the relayed message body.
    #[serde(default = "default_message_color", alias = "messageColor")]
    pub message_color: Color,

    /// Request header carrying the hex signature.
    #[serde(default = "default_signature_header", alias = "signatureHeader")]
    pub signature_header: String,

    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_body_bytes", alias = "maxBodyBytes")]
    pub max_body_bytes: usize,
}

fn default_label() -> String {
    "web".into()
}
fn default_label_color() -> Color {
    Color::Red
}
fn default_message_color() -> Color {
    Color::Cyan
}
fn default_signature_header() -> String {
    "Post-Signature".into()
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            client_secret: None,
            label: default_label(),
            label_color: default_label_color(),
            message_color: default_message_color(),
            signature_header: default_signature_header(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl RelayConfig {
    /// The configured secret, if one is present and non-empty.
    pub fn secret(&self) -> Option<&SharedSecret> {
        self.client_secret.as_ref().filter(|s| !s.is_empty())
    }

    /// Whether the relay endpoint may be activated.
    pub fn is_configured(&self) -> bool {
        self.secret().is_some()
    }

    /// Check the relay section for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.is_empty() {
            return Err(ConfigError::Invalid("relay: label must not be empty".into()));
        }
        if self.label_color == self.message_color {
            return Err(ConfigError::Invalid(format!(
                "relay: label_color and message_color must differ, both are {:?}",
                self.label_color
            )));
        }
        if self.signature_header.is_empty() {
            return Err(ConfigError::Invalid(
                "relay: signature_header must not be empty".into(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "relay: max_body_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// ── Server ───────────────────────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".into()
}
fn default_server_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
