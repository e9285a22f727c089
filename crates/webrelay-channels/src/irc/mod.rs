//! IRC transport.
//!
//! Connects to an IRC server over TCP, joins the configured channels, keeps
//! the joined-channel [`Roster`] in step with the server's JOIN/PART/KICK
//! echoes, and drains an outbound queue of `PRIVMSG` lines.

pub mod channel;
pub mod protocol;
pub mod roster;

pub use channel::IrcTransport;
pub use protocol::normalize_channel;
pub use roster::Roster;
