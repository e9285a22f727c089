//! Transport trait definitions.
//!
//! - [`ChatTransport`] -- what the relay core needs from chat: the joined
//!   channel snapshot, name normalization, formatting, and send
//! - [`Channel`] -- connection lifecycle for transports that hold a
//!   long-lived connection

use std::collections::HashSet;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use webrelay_types::config::Color;
use webrelay_types::error::ChannelError;

use crate::format;

/// The view of a chat network that the relay core depends on.
///
/// Implementations own the joined-channel roster and its synchronization.
/// Every method must be safe to call concurrently from request handlers.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Point-in-time snapshot of the channels currently joined.
    ///
    /// Entries are in normalized form (see
    /// [`normalize_channel_name`](ChatTransport::normalize_channel_name)).
    fn joined_channels(&self) -> HashSet<String>;

    /// Convert a bare channel name into this network's channel identifier.
    fn normalize_channel_name(&self, raw: &str) -> String;

    /// Render `(label) body` with the label and body in distinct colours.
    ///
    /// Defaults to IRC colour control codes.
    fn format_line(&self, label: &str, label_color: Color, body: &str, body_color: Color) -> String {
        format::format_line(label, label_color, body, body_color)
    }

    /// Hand `text` off for delivery to `channel`.
    ///
    /// Returns once the text is queued; chat-side delivery is not awaited.
    async fn send_text(&self, channel: &str, text: &str) -> Result<(), ChannelError>;
}

/// A transport with a connection lifecycle.
///
/// The binary calls [`start`](Channel::start) in a background task; it runs
/// until `cancel` is triggered.
#[async_trait]
pub trait Channel: ChatTransport {
    /// Transport identifier (e.g. `"irc"`).
    fn name(&self) -> &str;

    /// Run the transport until cancelled.
    async fn start(&self, cancel: CancellationToken) -> Result<(), ChannelError>;
}
