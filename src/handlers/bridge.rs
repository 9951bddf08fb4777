//! Stream relay bridge: !fixtwitter, !follow, !unfollow, !following, !link
//!
//! These handlers only forward requests; the relay task answers in the
//! channel itself.

use async_trait::async_trait;
use tracing::debug;

use super::{Context, Groups, Handler};
use crate::error::HandlerResult;
use crate::relay::RelayCommand;

const CONFUSED: &str = "Daar snap ik helemaal niets van.";

/// Forward `command` to the relay, if it is running.
fn forward(ctx: &Context<'_>, command: RelayCommand) {
    match ctx.relay {
        Some(relay) => relay.request(command),
        None => debug!(?command, "Stream relay disabled, ignoring"),
    }
}

/// Handler for `!fixtwitter`: force a reconnect of the stream.
pub struct FixStreamHandler;

#[async_trait]
impl Handler for FixStreamHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        if ctx.relay.is_none() {
            debug!("Stream relay disabled, ignoring !fixtwitter");
            return Ok(());
        }
        forward(ctx, RelayCommand::Reconnect);
        ctx.reply("Walvissen weggejaagd!").await
    }
}

/// Handler for `!follow <name>`.
pub struct FollowHandler;

#[async_trait]
impl Handler for FollowHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        let name = groups.get(1).trim();
        if name.is_empty() {
            return ctx.reply(CONFUSED).await;
        }
        forward(ctx, RelayCommand::Follow(name.to_string()));
        Ok(())
    }
}

/// Handler for `!unfollow <name>`.
pub struct UnfollowHandler;

#[async_trait]
impl Handler for UnfollowHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        let name = groups.get(1).trim();
        if name.is_empty() {
            return ctx.reply(CONFUSED).await;
        }
        forward(ctx, RelayCommand::Unfollow(name.to_string()));
        Ok(())
    }
}

/// Handler for `!following`.
pub struct FollowingHandler;

#[async_trait]
impl Handler for FollowingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        forward(ctx, RelayCommand::ListFollows);
        Ok(())
    }
}

/// Handler for `!link [author]`.
pub struct LinkHandler;

#[async_trait]
impl Handler for LinkHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        forward(ctx, RelayCommand::OutputLink(groups.get(1).trim().to_string()));
        Ok(())
    }
}
