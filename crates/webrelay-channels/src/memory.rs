//! In-process chat transport.
//!
//! Holds a roster that callers edit directly and records every line handed
//! to [`send_text`](ChatTransport::send_text). Used by tests and by
//! `webrelay serve --dry-run`, which logs relayed lines instead of
//! connecting to a chat network.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use webrelay_types::error::ChannelError;

use crate::format::strip_formatting;
use crate::irc::{Roster, normalize_channel};
use crate::traits::{Channel, ChatTransport};

/// A line recorded by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLine {
    /// Normalized channel identifier.
    pub channel: String,
    /// The text exactly as handed to the transport.
    pub text: String,
}

/// Chat transport that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    roster: Roster,
    sent: Mutex<Vec<SentLine>>,
}

impl MemoryTransport {
    /// Create a transport with no joined channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport already joined to `channels`.
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let transport = Self::new();
        for ch in channels {
            transport.join(ch.as_ref());
        }
        transport
    }

    /// Add `channel` to the roster.
    pub fn join(&self, channel: &str) {
        self.roster.insert(channel);
    }

    /// Remove `channel` from the roster.
    pub fn part(&self, channel: &str) {
        self.roster.remove(channel);
    }

    /// Every line sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentLine> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatTransport for MemoryTransport {
    fn joined_channels(&self) -> HashSet<String> {
        self.roster.snapshot()
    }

    fn normalize_channel_name(&self, raw: &str) -> String {
        normalize_channel(raw)
    }

    async fn send_text(&self, channel: &str, text: &str) -> Result<(), ChannelError> {
        let channel = normalize_channel(channel);
        info!(to = %channel, text = %strip_formatting(text), "dry-run relay");
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentLine {
                channel,
                text: text.to_string(),
            });
        Ok(())
    }
}

#[async_trait]
impl Channel for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    async fn start(&self, cancel: CancellationToken) -> Result<(), ChannelError> {
        cancel.cancelled().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_channels_normalizes() {
        let t = MemoryTransport::with_channels(["ops", "#Dev"]);
        assert_eq!(
            t.joined_channels(),
            HashSet::from(["#ops".to_string(), "#dev".to_string()])
        );
    }

    #[test]
    fn join_and_part() {
        let t = MemoryTransport::new();
        t.join("#ops");
        assert!(t.joined_channels().contains("#ops"));
        t.part("ops");
        assert!(t.joined_channels().is_empty());
    }

    #[tokio::test]
    async fn records_sends() {
        let t = MemoryTransport::new();
        t.send_text("ops", "hello").await.unwrap();
        assert_eq!(
            t.sent(),
            vec![SentLine {
                channel: "#ops".into(),
                text: "hello".into()
            }]
        );
    }

    #[tokio::test]
    async fn start_runs_until_cancelled() {
        let t = MemoryTransport::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        t.start(cancel).await.unwrap();
        assert_eq!(t.name(), "memory");
    }
}
