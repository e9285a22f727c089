//! The relay's shared secret.
//!
//! [`SharedSecret`] holds the key that callers and the relay both use for
//! `HMAC-SHA256`. It is read once from config or the environment and then
//! only handed to the MAC as bytes. It never appears in logs, `Debug`
//! output, or `webrelay config show`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// MAC key shared between the relay and its callers.
///
/// `Debug` prints `SharedSecret(unset)` or `SharedSecret([REDACTED])`.
/// Serializing always yields `""`, so a dumped config reloads with the
/// relay disabled rather than leaking the key.
#[derive(Clone)]
pub struct SharedSecret(Box<[u8]>);

impl SharedSecret {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self(key.into().into_boxed_slice())
    }

    /// Key bytes for the MAC. This is the only way to read the secret.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// An empty secret never activates the relay.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.0.is_empty() { "unset" } else { "[REDACTED]" };
        write!(f, "SharedSecret({shown})")
    }
}

impl Serialize for SharedSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for SharedSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
