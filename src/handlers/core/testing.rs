//! Test harness for driving handlers through the registry.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use eppo_proto::Operation;
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::{ChatMessage, Context, Registry};
use crate::config::BotConfig;
use crate::error::{HandlerResult, PagerError, ShortenError};
use crate::handlers::{LinkShortener, PagerSource};
use crate::network::Scheduler;
use crate::quotes::{Quote, QuoteStore};
use crate::relay::{RelayCommand, RelayHandle};
use crate::state::BotState;

pub const NICK: &str = "Janeppo";
pub const CHANNEL: &str = "#eppo";

pub fn bot_config() -> BotConfig {
    BotConfig {
        nickname: NICK.to_string(),
        server: "irc.example.net:6667".to_string(),
        channel: CHANNEL.to_string(),
        quotefile: "quotes.json".to_string(),
        url_length: 60,
        auto_ops: false,
        verbose: false,
        colors: true,
        realname: "Go Bot".to_string(),
        butterfly_delay_secs: 120,
        seed: Some(42),
    }
}

pub fn fixture_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Erik", "This is a test"),
        Quote::new(
            "Harm",
            "Let's be honest - almost right is the same as completely wrong.",
        ),
        Quote::new("Mark", "There's a new LaTeX-reader this year!"),
    ]
}

/// Shortener answering every link with the same result.
pub struct FixedShortener(pub Option<&'static str>);

#[async_trait]
impl LinkShortener for FixedShortener {
    async fn shorten(&self, _url: &str) -> Result<String, ShortenError> {
        self.0.map(str::to_string).ok_or(ShortenError::Empty)
    }
}

/// Pager serving a fixed page, or failing when there is none.
pub struct FixedPager(pub Option<&'static str>);

#[async_trait]
impl PagerSource for FixedPager {
    async fn fetch_page(&self) -> Result<String, PagerError> {
        self.0.map(str::to_string).ok_or(PagerError::Status(503))
    }
}

/// A registry wired to in-memory outlets.
pub struct TestBed {
    pub config: BotConfig,
    pub state: BotState,
    registry: Registry,
    out: mpsc::Sender<Operation>,
    out_rx: mpsc::Receiver<Operation>,
    scheduler: Scheduler,
    relay: Option<RelayHandle>,
    relay_rx: Option<mpsc::Receiver<RelayCommand>>,
    shortener: Arc<dyn LinkShortener>,
    pager: Arc<dyn PagerSource>,
    dir: TempDir,
}

impl TestBed {
    /// Fixture quotes persisted to a temporary quote file, fixed seed, no relay.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let quotes = QuoteStore::from_quotes(fixture_quotes(), dir.path().join("quotes.json"));
        quotes.persist().unwrap();

        let config = bot_config();
        let (out, out_rx) = mpsc::channel(64);
        Self {
            state: BotState::new(quotes, config.seed),
            registry: Registry::new(&config.nickname).unwrap(),
            scheduler: Scheduler::new(out.clone()),
            config,
            out,
            out_rx,
            relay: None,
            relay_rx: None,
            shortener: Arc::new(FixedShortener(None)),
            pager: Arc::new(FixedPager(None)),
            dir,
        }
    }

    pub fn with_relay(mut self) -> Self {
        let (tx, rx) = mpsc::channel(16);
        self.relay = Some(RelayHandle::new(tx));
        self.relay_rx = Some(rx);
        self
    }

    pub fn with_shortener(mut self, shortener: impl LinkShortener + 'static) -> Self {
        self.shortener = Arc::new(shortener);
        self
    }

    pub fn with_pager(mut self, pager: impl PagerSource + 'static) -> Self {
        self.pager = Arc::new(pager);
        self
    }

    pub fn quote_path(&self) -> PathBuf {
        self.dir.path().join("quotes.json")
    }

    /// Deliver `text` from `sender` in the bot's channel.
    pub async fn say(&mut self, sender: &str, text: &str) -> HandlerResult {
        self.deliver(ChatMessage::new(CHANNEL, sender, text)).await
    }

    /// Deliver `text` from `sender` as a private query.
    pub async fn query(&mut self, sender: &str, text: &str) -> HandlerResult {
        self.deliver(ChatMessage::new(sender, sender, text)).await
    }

    async fn deliver(&mut self, msg: ChatMessage) -> HandlerResult {
        let mut ctx = Context {
            msg: &msg,
            config: &self.config,
            state: &mut self.state,
            out: &self.out,
            scheduler: &self.scheduler,
            relay: self.relay.as_ref(),
            shortener: &self.shortener,
            pager: &self.pager,
        };
        self.registry.dispatch(&mut ctx).await
    }

    /// Operations queued so far.
    pub fn sent(&mut self) -> Vec<Operation> {
        let mut ops = Vec::new();
        while let Ok(op) = self.out_rx.try_recv() {
            ops.push(op);
        }
        ops
    }

    /// Wait for the next operation, including ones sent by spawned tasks.
    pub async fn next_sent(&mut self) -> Option<Operation> {
        self.out_rx.recv().await
    }

    /// Relay commands queued so far.
    pub fn relay_commands(&mut self) -> Vec<RelayCommand> {
        let mut commands = Vec::new();
        if let Some(rx) = self.relay_rx.as_mut() {
            while let Ok(cmd) = rx.try_recv() {
                commands.push(cmd);
            }
        }
        commands
    }
}

/// Replies (text only) among `ops`.
pub fn replies(ops: &[Operation]) -> Vec<(&str, &str)> {
    ops.iter()
        .filter_map(|op| match op {
            Operation::Reply { channel, text } => Some((channel.as_str(), text.as_str())),
            Operation::Raw { .. } => None,
        })
        .collect()
}
