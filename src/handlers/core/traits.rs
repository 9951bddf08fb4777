//! The handler trait.

use async_trait::async_trait;

use super::context::{Context, Groups};
use crate::error::HandlerResult;

/// A command handler, invoked with the capture groups of its pattern.
///
/// Handlers answer through `ctx`; only a closed output queue or a requested
/// shutdown is reported as an error.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult;
}
