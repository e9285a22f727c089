//! Chat transports for webrelay.
//!
//! The relay core talks to chat through the narrow [`ChatTransport`]
//! trait: a snapshot of joined channels, a channel-name normalizer, a line
//! formatter, and a non-blocking send. Long-running transports also
//! implement [`Channel`] so the binary can drive their connection
//! lifecycle.
//!
//! # Architecture
//!
//! ```text
//!   IrcTransport ──start(cancel)──> connection task
//!        │                              │   ▲
//!   send_text ──> outbound queue ───────┘   │ JOIN/PART/KICK
//!        │                                  │
//!   joined_channels <── Roster <────────────┘
//! ```
//!
//! [`MemoryTransport`] implements the same traits in-process.

pub mod format;
pub mod irc;
pub mod memory;
pub mod traits;

pub use irc::IrcTransport;
pub use memory::MemoryTransport;
pub use traits::*;

// Re-export the canonical error type so callers do not need to depend
// on webrelay-types directly for transport errors.
pub use webrelay_types::error::ChannelError;
