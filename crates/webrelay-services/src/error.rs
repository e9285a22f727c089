//! Relay error types.

use thiserror::Error;

use webrelay_types::error::ChannelError;

/// Reasons a relay request is rejected.
///
/// The two signature failures are distinguished for logging only; both
/// surface to the caller as the same 403 response.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The signature header was absent.
    #[error("missing signature")]
    MissingSignature,

    /// The signature did not match the MAC of the body.
    #[error("bad signature")]
    BadSignature,

    /// The target channel is not currently joined.
    #[error("channel not present: {0}")]
    ChannelNotPresent(String),

    /// The authenticated body is not valid UTF-8.
    #[error("message is not valid UTF-8: {0}")]
    TextDecode(#[from] std::str::Utf8Error),

    /// The chat transport refused the hand-off.
    #[error("transport error: {0}")]
    Transport(#[from] ChannelError),
}

impl RelayError {
    /// HTTP status code for this rejection.
    pub fn status(&self) -> u16 {
        match self {
            RelayError::MissingSignature | RelayError::BadSignature => 403,
            RelayError::ChannelNotPresent(_) => 404,
            RelayError::TextDecode(_) => 400,
            RelayError::Transport(_) => 503,
        }
    }

    /// Whether this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, RelayError::MissingSignature | RelayError::BadSignature)
    }

    /// Response body shown to the caller.
    ///
    /// Never reveals which signature check failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingSignature | RelayError::BadSignature => {
                "Request signature rejected"
            }
            RelayError::ChannelNotPresent(_) => "Can't relay to non-present channels",
            RelayError::TextDecode(_) => "Message body is not valid UTF-8",
            RelayError::Transport(_) => "Chat transport unavailable",
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, RelayError>;
