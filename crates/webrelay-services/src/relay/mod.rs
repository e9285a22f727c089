//! The relay: authenticate a signed body, then dispatch it into chat.

pub mod auth;
pub mod dispatch;

use std::sync::Arc;

use tracing::{info, warn};

use webrelay_channels::ChatTransport;
use webrelay_types::config::RelayConfig;
use webrelay_types::secret::SharedSecret;

pub use auth::{Authenticator, SIGNATURE_HEADER};
pub use dispatch::{Dispatcher, RelayOutcome, RelayStyle};

/// Authentication composed with dispatch.
///
/// Only exists when a shared secret is configured; see
/// [`RelayService::from_config`].
pub struct RelayService {
    auth: Authenticator,
    dispatcher: Dispatcher,
    signature_header: String,
    max_body_bytes: usize,
}

impl RelayService {
    /// Build a relay keyed with `secret` over `transport`.
    pub fn new(
        secret: &SharedSecret,
        config: &RelayConfig,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            auth: Authenticator::new(secret),
            dispatcher: Dispatcher::new(transport, RelayStyle::from(config)),
            signature_header: config.signature_header.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Build a relay from config, or `None` when no secret is set.
    ///
    /// An unconfigured relay must never accept traffic, so the caller
    /// simply does not register the endpoint.
    pub fn from_config(config: &RelayConfig, transport: Arc<dyn ChatTransport>) -> Option<Self> {
        match config.secret() {
            Some(secret) => Some(Self::new(secret, config, transport)),
            None => {
                info!("relay not configured, refusing to activate");
                None
            }
        }
    }

    /// Header name the signature is read from.
    pub fn signature_header(&self) -> &str {
        &self.signature_header
    }

    /// Largest request body accepted.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Handle one relay request.
    ///
    /// Authentication runs first; nothing about the channel or the body is
    /// inspected for an unauthenticated request.
    pub async fn handle(
        &self,
        raw_body: &[u8],
        claimed_signature: Option<&str>,
        channel_name: &str,
    ) -> RelayOutcome {
        let body = match self.auth.verify(raw_body, claimed_signature) {
            Ok(body) => body,
            Err(e) => {
                warn!(reason = %e, body_len = raw_body.len(), "rejected relay request");
                return RelayOutcome::Rejected(e);
            }
        };
        self.dispatcher.dispatch(body, channel_name).await
    }
}
