//! # webrelay-types
//!
//! Shared type definitions for the webrelay HTTP-to-chat bridge.
//!
//! - **[`config`]** -- Configuration schema and config-file discovery
//! - **[`error`]** -- [`ChannelError`] and [`ConfigError`]
//! - **[`secret`]** -- [`SharedSecret`](secret::SharedSecret), the redacted MAC key

pub mod config;
pub mod error;
pub mod secret;

pub use error::{ChannelError, ConfigError};
