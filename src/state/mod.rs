//! State management module.
//!
//! Contains the bot's mutable state: the quote store, the random source and
//! the op toggles waiting on a `NAMES` reply.

mod bot;
mod butterfly;

pub use bot::BotState;
