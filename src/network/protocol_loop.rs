//! The protocol loop.
//!
//! Reads one line at a time from the server, answers keepalives and
//! invitations directly and hands chat messages to the command registry.
//! Everything it sends goes through the output queue, never the socket.

use std::sync::Arc;

use eppo_proto::{Inbound, Operation, ProtocolError};
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::Scheduler;
use crate::config::Config;
use crate::error::{BotError, HandlerError, HandlerResult};
use crate::handlers::{ChatMessage, Context, LinkShortener, PagerSource, Registry};
use crate::relay::RelayHandle;
use crate::state::BotState;

/// Why a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The bot was told to leave; do not reconnect.
    Shutdown,
    /// The connection failed or was closed; reconnect.
    Lost(BotError),
}

/// Bot side of a session: state, handlers and outlets.
///
/// One `Bot` lives for the whole process and serves every connection.
pub struct Bot {
    config: Arc<Config>,
    registry: Registry,
    state: BotState,
    out: mpsc::Sender<Operation>,
    scheduler: Scheduler,
    relay: Option<RelayHandle>,
    shortener: Arc<dyn LinkShortener>,
    pager: Arc<dyn PagerSource>,
    /// Nickname for the current connection; grows on `433`.
    nick: String,
}

impl Bot {
    pub fn new(
        config: Arc<Config>,
        registry: Registry,
        state: BotState,
        out: mpsc::Sender<Operation>,
        relay: Option<RelayHandle>,
        shortener: Arc<dyn LinkShortener>,
        pager: Arc<dyn PagerSource>,
    ) -> Self {
        Self {
            nick: config.bot.nickname.clone(),
            scheduler: Scheduler::new(out.clone()),
            config,
            registry,
            state,
            out,
            relay,
            shortener,
            pager,
        }
    }

    /// Serve one connection until it ends.
    pub async fn run<S>(&mut self, lines: &mut S) -> SessionEnd
    where
        S: Stream<Item = Result<String, ProtocolError>> + Unpin,
    {
        self.nick = self.config.bot.nickname.clone();

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => return SessionEnd::Lost(e.into()),
            };
            match self.handle_line(&line).await {
                Ok(()) => {}
                Err(HandlerError::Shutdown) => return SessionEnd::Shutdown,
                Err(HandlerError::Send(_)) => return SessionEnd::Lost(BotError::OutputClosed),
            }
        }
        SessionEnd::Lost(BotError::ConnectionClosed)
    }

    async fn handle_line(&mut self, line: &str) -> HandlerResult {
        if self.config.bot.verbose {
            info!(line = %line, "<<");
        }

        let Some(inbound) = Inbound::parse(line) else {
            debug!(line = %line, "Skipping malformed line");
            return Ok(());
        };

        match inbound {
            Inbound::Ping(token) => self.send(Operation::raw("PONG", token)).await,
            Inbound::Privmsg {
                sender,
                target,
                text,
            } => {
                let channel = if target.eq_ignore_ascii_case(&self.nick) {
                    sender.clone()
                } else {
                    target
                };
                self.dispatch(ChatMessage::new(channel, sender, text)).await
            }
            Inbound::Invite { channel } => {
                info!(channel = %channel, "Invited, joining");
                self.send(Operation::raw("JOIN", channel)).await
            }
            Inbound::Join { nick, channel } => {
                if self.config.bot.auto_ops && !nick.eq_ignore_ascii_case(&self.nick) {
                    self.send(Operation::raw("MODE", format!("{channel} +o {nick}")))
                        .await
                } else {
                    Ok(())
                }
            }
            Inbound::Welcome => {
                info!(nick = %self.nick, channel = %self.config.bot.channel, "Registered, joining channel");
                self.send(Operation::raw("JOIN", self.config.bot.channel.as_str()))
                    .await
            }
            Inbound::NickInUse => {
                self.nick.push('_');
                warn!(nick = %self.nick, "Nickname in use, trying another");
                self.send(Operation::raw("NICK", self.nick.as_str())).await
            }
            Inbound::NamesReply { channel, names } => {
                self.state.butterflies.observe_names(&channel, &names);
                Ok(())
            }
            Inbound::EndOfNames { channel } => {
                let delay = self.config.bot.butterfly_delay();
                for op in self.state.butterflies.resolve(&channel) {
                    self.scheduler.schedule(delay, op);
                }
                Ok(())
            }
            Inbound::Other => Ok(()),
        }
    }

    async fn dispatch(&mut self, msg: ChatMessage) -> HandlerResult {
        let mut ctx = Context {
            msg: &msg,
            config: &self.config.bot,
            state: &mut self.state,
            out: &self.out,
            scheduler: &self.scheduler,
            relay: self.relay.as_ref(),
            shortener: &self.shortener,
            pager: &self.pager,
        };
        self.registry.dispatch(&mut ctx).await
    }

    async fn send(&self, op: Operation) -> HandlerResult {
        self.out.send(op).await?;
        Ok(())
    }
}
