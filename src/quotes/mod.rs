//! The quote database.
//!
//! An ordered list of `{name, text}` pairs kept in memory and mirrored to a
//! JSON file. Only the protocol loop touches it, so there is no locking.

mod store;
mod submission;

pub use store::{Quote, QuoteStore};
