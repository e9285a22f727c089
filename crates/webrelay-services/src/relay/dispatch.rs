//! Relay dispatch: channel-presence gate, formatting, and hand-off.
//!
//! ```text
//! channel name ──normalize──> identifier ──in joined set?──no──> 404
//!                                              │yes
//!                              body ──UTF-8?──no──> 400
//!                                              │yes
//!                     format_line ──> send_text ──> 202
//! ```
//!
//! The transport is only called after every check has passed, so a
//! rejected or abandoned request leaves no trace in chat.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use webrelay_channels::ChatTransport;
use webrelay_types::config::{Color, RelayConfig};

use crate::error::RelayError;

/// How relayed lines are presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayStyle {
    /// Literal source label (e.g. `"web"`).
    pub label: String,
    /// Colour of the label.
    pub label_color: Color,
    /// Colour of the message body.
    pub message_color: Color,
}

impl Default for RelayStyle {
    fn default() -> Self {
        Self::from(&RelayConfig::default())
    }
}

impl From<&RelayConfig> for RelayStyle {
    fn from(config: &RelayConfig) -> Self {
        Self {
            label: config.label.clone(),
            label_color: config.label_color,
            message_color: config.message_color,
        }
    }
}

/// Result of one relay decision.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The formatted line was handed to the transport.
    Relayed {
        /// Resolved channel identifier.
        channel: String,
        /// Formatted line as sent.
        message: String,
    },
    /// The request was refused.
    Rejected(RelayError),
}

impl RelayOutcome {
    /// HTTP status code for this outcome.
    pub fn status(&self) -> u16 {
        match self {
            RelayOutcome::Relayed { .. } => 202,
            RelayOutcome::Rejected(err) => err.status(),
        }
    }

    /// Response body for this outcome.
    pub fn body(&self) -> String {
        match self {
            RelayOutcome::Relayed { channel, .. } => format!("Message relayed to {channel}"),
            RelayOutcome::Rejected(err) => err.public_message().to_string(),
        }
    }

    /// `(body, status)` pair returned to the HTTP caller.
    pub fn into_response(self) -> (String, u16) {
        (self.body(), self.status())
    }

    /// Whether the message was handed off.
    pub fn is_relayed(&self) -> bool {
        matches!(self, RelayOutcome::Relayed { .. })
    }
}

/// Routes authenticated messages into joined channels.
pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    style: RelayStyle,
}

impl Dispatcher {
    /// Create a dispatcher over `transport`.
    pub fn new(transport: Arc<dyn ChatTransport>, style: RelayStyle) -> Self {
        Self { transport, style }
    }

    /// The transport this dispatcher sends through.
    pub fn transport(&self) -> &Arc<dyn ChatTransport> {
        &self.transport
    }

    /// Relay `message` to `channel_name`, checking membership against a
    /// fresh snapshot of the joined channels.
    pub async fn dispatch(&self, message: &[u8], channel_name: &str) -> RelayOutcome {
        let joined = self.transport.joined_channels();
        self.dispatch_with(message, channel_name, &joined).await
    }

    /// Relay `message` to `channel_name`, checking membership against
    /// `joined`.
    pub async fn dispatch_with(
        &self,
        message: &[u8],
        channel_name: &str,
        joined: &HashSet<String>,
    ) -> RelayOutcome {
        let channel = self.transport.normalize_channel_name(channel_name);

        if !joined.contains(&channel) {
            warn!(channel = %channel, "can't relay to non-present channel");
            return RelayOutcome::Rejected(RelayError::ChannelNotPresent(channel));
        }

        let text = match std::str::from_utf8(message) {
            Ok(text) => text,
            Err(e) => {
                warn!(channel = %channel, error = %e, "message body is not valid UTF-8");
                return RelayOutcome::Rejected(RelayError::TextDecode(e));
            }
        };

        let line = self.transport.format_line(
            &self.style.label,
            self.style.label_color,
            text,
            self.style.message_color,
        );

        info!(channel = %channel, body_len = text.len(), "relaying");
        if let Err(e) = self.transport.send_text(&channel, &line).await {
            warn!(channel = %channel, error = %e, "transport refused relayed message");
            return RelayOutcome::Rejected(RelayError::Transport(e));
        }

        RelayOutcome::Relayed {
            channel,
            message: line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrelay_channels::MemoryTransport;
    use webrelay_channels::format::strip_formatting;

    fn dispatcher(transport: &Arc<MemoryTransport>) -> Dispatcher {
        Dispatcher::new(transport.clone(), RelayStyle::default())
    }

    #[tokio::test]
    async fn relays_to_joined_channel() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let outcome = dispatcher(&transport).dispatch(b"hello", "ops").await;

        assert!(outcome.is_relayed());
        assert_eq!(outcome.status(), 202);
        assert_eq!(outcome.body(), "Message relayed to #ops");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel, "#ops");
        assert!(sent[0].text.contains("hello"));
        assert!(sent[0].text.contains("web"));
        assert_eq!(strip_formatting(&sent[0].text), "(web) hello");
    }

    #[tokio::test]
    async fn formatted_line_has_two_distinct_colors() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let outcome = dispatcher(&transport).dispatch(b"deploy done", "ops").await;
        let RelayOutcome::Relayed { message, .. } = outcome else {
            panic!("expected relay");
        };
        assert!(message.contains("\x0304web\x03"));
        assert!(message.contains("\x0310deploy done\x03"));
    }

    #[tokio::test]
    async fn absent_channel_is_rejected_without_send() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let outcome = dispatcher(&transport).dispatch(b"hello", "nosuchroom").await;

        assert_eq!(outcome.status(), 404);
        assert!(matches!(
            outcome,
            RelayOutcome::Rejected(RelayError::ChannelNotPresent(ref ch)) if ch == "#nosuchroom"
        ));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn invalid_utf8_is_rejected_without_send() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let outcome = dispatcher(&transport).dispatch(&[0xff, 0xfe], "ops").await;
        assert_eq!(outcome.status(), 400);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn membership_is_checked_before_decoding() {
        let transport = Arc::new(MemoryTransport::new());
        let outcome = dispatcher(&transport).dispatch(&[0xff], "ops").await;
        assert_eq!(outcome.status(), 404);
    }

    #[tokio::test]
    async fn membership_is_rechecked_every_request() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let d = dispatcher(&transport);
        assert_eq!(d.dispatch(b"one", "ops").await.status(), 202);
        transport.part("#ops");
        assert_eq!(d.dispatch(b"two", "ops").await.status(), 404);
        transport.join("#ops");
        assert_eq!(d.dispatch(b"three", "ops").await.status(), 202);
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn dispatch_with_uses_given_snapshot() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let d = dispatcher(&transport);
        let snapshot = HashSet::new();
        let outcome = d.dispatch_with(b"hello", "ops", &snapshot).await;
        assert_eq!(outcome.status(), 404);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn custom_style_is_applied() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let style = RelayStyle {
            label: "ci".into(),
            label_color: Color::Green,
            message_color: Color::Yellow,
        };
        let d = Dispatcher::new(transport.clone(), style);
        d.dispatch(b"build passed", "ops").await;
        assert_eq!(
            transport.sent()[0].text,
            "(\x0303ci\x03) \x0308build passed\x03"
        );
    }

    #[tokio::test]
    async fn empty_message_is_relayed() {
        let transport = Arc::new(MemoryTransport::with_channels(["#ops"]));
        let outcome = dispatcher(&transport).dispatch(b"", "ops").await;
        assert_eq!(outcome.status(), 202);
    }

    #[test]
    fn into_response_pairs_body_and_status() {
        let outcome = RelayOutcome::Relayed {
            channel: "#ops".into(),
            message: "x".into(),
        };
        assert_eq!(
            outcome.into_response(),
            ("Message relayed to #ops".to_string(), 202)
        );

        let outcome = RelayOutcome::Rejected(RelayError::BadSignature);
        assert_eq!(
            outcome.into_response(),
            ("Request signature rejected".to_string(), 403)
        );
    }
}
