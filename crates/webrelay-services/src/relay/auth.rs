//! Request signature verification.
//!
//! A caller proves it holds the shared secret by sending
//! `hex(HMAC-SHA256(secret, body))` in the signature header:
//!
//! 1. Read the raw body bytes exactly as received.
//! 2. Compute `HMAC-SHA256(secret, body)` and render it as lowercase hex.
//! 3. Compare against the header value in constant time.
//!
//! The MAC covers bytes, never a parsed or re-encoded form of the body.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use webrelay_types::secret::SharedSecret;

use crate::error::RelayError;

/// Default request header carrying the signature.
pub const SIGNATURE_HEADER: &str = "Post-Signature";

type HmacSha256 = Hmac<Sha256>;

/// Verifies request signatures against one shared secret.
#[derive(Clone)]
pub struct Authenticator {
    secret: SharedSecret,
}

impl Authenticator {
    /// Create an authenticator keyed with `secret`.
    pub fn new(secret: &SharedSecret) -> Self {
        Self {
            secret: secret.clone(),
        }
    }

    /// Create an authenticator from raw key bytes.
    pub fn from_key(key: &[u8]) -> Self {
        Self {
            secret: SharedSecret::new(key),
        }
    }

    /// Lowercase hex HMAC-SHA256 of `body`, or `None` if the key is
    /// refused by the MAC.
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.secret.as_bytes()) else {
            return None;
        };
        mac.update(body);
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check `claimed` against the MAC of `raw_body`.
    ///
    /// Returns the body unchanged on success. An absent signature fails
    /// before any MAC is computed. An empty body is still authenticated.
    pub fn verify<'a>(
        &self,
        raw_body: &'a [u8],
        claimed: Option<&str>,
    ) -> Result<&'a [u8], RelayError> {
        let Some(claimed) = claimed else {
            debug!("no signature");
            return Err(RelayError::MissingSignature);
        };

        let Some(digest) = self.sign(raw_body) else {
            warn!("relay secret cannot key HMAC-SHA256");
            return Err(RelayError::BadSignature);
        };
        if !constant_time_eq(digest.as_bytes(), claimed.as_bytes()) {
            debug!(body_len = raw_body.len(), "invalid signature");
            return Err(RelayError::BadSignature);
        }

        debug!(body_len = raw_body.len(), "valid signature");
        Ok(raw_body)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

/// Verify `claimed` as the signature of `raw_body` under `secret`.
pub fn verify<'a>(
    raw_body: &'a [u8],
    claimed: Option<&str>,
    secret: &[u8],
) -> Result<&'a [u8], RelayError> {
    if claimed.is_none() {
        debug!("no signature");
        return Err(RelayError::MissingSignature);
    }
    Authenticator::from_key(secret).verify(raw_body, claimed)
}

/// Compute the signature a caller must send for `body` (used by
/// `webrelay sign` and tests).
pub fn sign(secret: &[u8], body: &[u8]) -> Option<String> {
    Authenticator::from_key(secret).sign(body)
}

/// Byte comparison whose running time does not depend on where the inputs
/// differ. Lengths are not secret: a digest is always 64 hex characters.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
