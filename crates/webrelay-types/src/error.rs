//! Error types shared across the webrelay crates.

use thiserror::Error;

/// Errors from a chat transport.
///
/// Reported by transport implementations (IRC, in-memory) when a message
/// cannot be handed off or the connection cannot be established.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChannelError {
    /// Failed to establish a connection to the chat server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Handing a message to the transport failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The transport is not currently connected.
    #[error("not connected")]
    NotConnected,

    /// The target is not a valid channel identifier.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Catch-all for errors that do not fit other variants.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while locating, reading, or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON or does not match the schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// The config parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_error_display() {
        let err = ChannelError::ConnectionFailed("refused".into());
        assert_eq!(err.to_string(), "connection failed: refused");

        let err = ChannelError::SendFailed("queue closed".into());
        assert_eq!(err.to_string(), "send failed: queue closed");

        assert_eq!(ChannelError::NotConnected.to_string(), "not connected");

        let err = ChannelError::InvalidTarget("#bad chan".into());
        assert_eq!(err.to_string(), "invalid target: #bad chan");

        let err = ChannelError::Other("boom".into());
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Invalid("irc: server is required".into());
        assert_eq!(err.to_string(), "invalid config: irc: server is required");

        let err = ConfigError::Io {
            path: "/nope.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope.json"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn config_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
