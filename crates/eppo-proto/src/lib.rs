//! # eppo-proto
//!
//! The small slice of the IRC line protocol that a chat bot needs.
//!
//! ## Features
//!
//! - Newline framing for tokio with over-long line discarding ([`LineCodec`])
//! - Classification of inbound server lines ([`Inbound`])
//! - Outbound operations rendered to wire form ([`Operation`])
//! - IRC colour and formatting codes ([`colors`])
//!
//! ## Quick Start
//!
//! ```rust
//! use eppo_proto::{Inbound, Operation};
//!
//! let line = ":alice!a@host PRIVMSG #eppo :!collega";
//! if let Some(Inbound::Privmsg { sender, target, text }) = Inbound::parse(line) {
//!     let reply = Operation::reply(target, format!("hallo {sender}, je zei {text}"));
//!     assert_eq!(reply.to_string(), "PRIVMSG #eppo :hallo alice, je zei !collega");
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod colors;
pub mod error;
pub mod inbound;
#[cfg(feature = "tokio")]
pub mod line;
pub mod operation;

pub use self::colors::{Color, FormattedStringExt};
pub use self::error::ProtocolError;
pub use self::inbound::Inbound;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::operation::Operation;

/// Maximum line length accepted from a server, terminator included.
///
/// RFC 1459 caps lines at 512 bytes, but servers with message tags send more.
pub const MAX_LINE_LEN: usize = 8191;
