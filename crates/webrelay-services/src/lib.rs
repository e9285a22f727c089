//! Relay core and HTTP surface for webrelay.
//!
//! - [`relay`] -- request authentication ([`relay::auth`]) and relay
//!   dispatch ([`relay::dispatch`]), composed by [`relay::RelayService`]
//! - [`error`] -- the relay rejection taxonomy and its status mapping
//! - `api` -- axum router exposing `POST /relay/{channel}` and `GET /health`
//!   (feature `api`, on by default)

#[cfg(feature = "api")]
pub mod api;
pub mod error;
pub mod relay;

pub use error::RelayError;
pub use relay::{RelayOutcome, RelayService};
