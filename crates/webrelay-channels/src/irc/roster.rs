//! Joined-channel roster shared between the connection task and readers.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use super::protocol::normalize_channel;

/// The set of channels the connection currently belongs to.
///
/// Written only by the connection task; readers take snapshots.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current membership.
    pub fn snapshot(&self) -> HashSet<String> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether `channel` (in any case or prefix form) is joined.
    pub fn contains(&self, channel: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&normalize_channel(channel))
    }

    /// Record a join.
    pub fn insert(&self, channel: &str) {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(normalize_channel(channel));
    }

    /// Record a part or kick. Returns `true` if the channel was present.
    pub fn remove(&self, channel: &str) -> bool {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&normalize_channel(channel))
    }

    /// Forget every channel (connection lost).
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Number of joined channels.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether no channel is joined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_normalizes() {
        let roster = Roster::new();
        roster.insert("#Ops");
        assert!(roster.contains("#ops"));
        assert!(roster.contains("ops"));
        assert_eq!(roster.snapshot(), HashSet::from(["#ops".to_string()]));
    }

    #[test]
    fn remove_and_clear() {
        let roster = Roster::new();
        roster.insert("#ops");
        roster.insert("#dev");
        assert_eq!(roster.len(), 2);
        assert!(roster.remove("#ops"));
        assert!(!roster.remove("#ops"));
        roster.clear();
        assert!(roster.is_empty());
    }

    #[test]
    fn snapshot_is_detached() {
        let roster = Roster::new();
        roster.insert("#ops");
        let snap = roster.snapshot();
        roster.remove("#ops");
        assert!(snap.contains("#ops"));
        assert!(!roster.contains("#ops"));
    }

    #[test]
    fn clones_share_state() {
        let roster = Roster::new();
        let writer = roster.clone();
        writer.insert("#ops");
        assert!(roster.contains("#ops"));
    }
}
