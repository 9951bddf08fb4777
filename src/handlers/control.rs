//! Bot control handlers: disconnect, !raw, !ops

use async_trait::async_trait;
use eppo_proto::Operation;
use tracing::{info, warn};

use super::{Context, Groups, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Handler for `<nick>: verdwijn`.
///
/// Says goodbye and ends the process.
pub struct DisconnectHandler;

#[async_trait]
impl Handler for DisconnectHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        warn!(sender = %ctx.msg.sender, channel = %ctx.msg.channel, "Told to leave");
        ctx.send(Operation::raw("QUIT", ":Ik ga al")).await?;
        Err(HandlerError::Shutdown)
    }
}

/// Handler for `!raw <verb> <arguments>`.
///
/// Only accepted in a private query.
pub struct RawHandler;

#[async_trait]
impl Handler for RawHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        if !ctx.msg.is_private() {
            return Ok(());
        }
        info!(sender = %ctx.msg.sender, verb = groups.get(1), "Sending raw command");
        ctx.send(Operation::raw(groups.get(1), groups.get(2))).await
    }
}

/// Handler for `!ops`: op the sender in the channel it came from.
pub struct OpsHandler;

#[async_trait]
impl Handler for OpsHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        if ctx.msg.is_private() {
            return Ok(());
        }
        ctx.send(Operation::raw(
            "MODE",
            format!("{} +o {}", ctx.msg.channel, ctx.msg.sender),
        ))
        .await
    }
}
