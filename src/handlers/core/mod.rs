//! Core handler infrastructure.
//!
//! This module contains the fundamental types and infrastructure for the
//! command handler system: the ordered pattern registry, the context handed
//! to handlers, and the handler trait itself.

pub mod context;
pub mod registry;
#[cfg(test)]
pub mod testing;
pub mod traits;

// Re-export commonly used types
pub use context::{ChatMessage, Context, Groups};
pub use registry::Registry;
pub use traits::Handler;
