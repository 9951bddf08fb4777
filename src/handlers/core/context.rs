//! Command handler context and core types.
//!
//! Defines the `Context<'a>` struct passed to all handlers: the message being
//! answered, the bot's state, and the outlets handlers write to.

use std::sync::Arc;

use eppo_proto::Operation;
use regex::Captures;
use tokio::sync::mpsc;

use crate::config::BotConfig;
use crate::error::HandlerResult;
use crate::handlers::{LinkShortener, PagerSource};
use crate::network::Scheduler;
use crate::relay::RelayHandle;
use crate::state::BotState;

/// One inbound chat message.
///
/// For private queries `channel` is the sender's nickname, so replies to
/// `channel` always reach the right place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub channel: String,
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(
        channel: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// Sent directly to the bot rather than in a channel.
    pub fn is_private(&self) -> bool {
        self.channel == self.sender
    }
}

/// Capture groups of the pattern that matched.
///
/// Group 0 is the whole match; groups that did not participate read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups(Vec<Option<String>>);

impl Groups {
    pub fn from_captures(caps: &Captures<'_>) -> Self {
        Self(
            caps.iter()
                .map(|m| m.map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> &str {
        self.0
            .get(index)
            .and_then(|group| group.as_deref())
            .unwrap_or("")
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The message being handled.
    pub msg: &'a ChatMessage,
    /// Bot configuration.
    pub config: &'a BotConfig,
    /// Quotes, randomness and pending toggles.
    pub state: &'a mut BotState,
    /// Outbound operations, written by the multiplexer in order.
    pub out: &'a mpsc::Sender<Operation>,
    /// Delayed operations.
    pub scheduler: &'a Scheduler,
    /// Control channel of the stream relay, when it runs.
    pub relay: Option<&'a RelayHandle>,
    /// Link shortening service.
    pub shortener: &'a Arc<dyn LinkShortener>,
    /// Emergency pager page.
    pub pager: &'a Arc<dyn PagerSource>,
}

impl Context<'_> {
    /// Send a message to the channel (or query) the command came from.
    pub async fn reply(&self, text: impl Into<String>) -> HandlerResult {
        self.send(Operation::reply(&self.msg.channel, text)).await
    }

    /// Send a private message to the sender.
    pub async fn whisper(&self, text: impl Into<String>) -> HandlerResult {
        self.send(Operation::reply(&self.msg.sender, text)).await
    }

    pub async fn send(&self, op: Operation) -> HandlerResult {
        self.out.send(op).await?;
        Ok(())
    }
}
