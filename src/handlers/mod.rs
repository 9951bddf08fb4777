//! Chat command handlers.
//!
//! Every inbound chat message is matched against the ordered pattern table in
//! [`Registry`]; the first matching handler answers through its [`Context`].
//! Handlers never touch the socket: they queue [`eppo_proto::Operation`]s for
//! the output multiplexer, schedule delayed ones, or forward requests to the
//! stream relay.

mod core;

pub mod bridge;
pub mod control;
pub mod fun;
pub mod lookup;
pub mod quotes;
pub mod shortener;

pub use self::core::{ChatMessage, Context, Groups, Handler, Registry};
pub use lookup::{HttpPagerSource, PagerSource};
pub use shortener::{HttpShortener, LinkShortener};
