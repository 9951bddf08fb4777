//! eppobot - the retired professor of the channel
//!
//! An IRC quote bot: answers free-text commands from a small quote database
//! and relays a live stream into the same channel.

mod config;
mod error;
mod handlers;
mod network;
mod quotes;
mod relay;
mod state;

use crate::config::Config;
use crate::handlers::{HttpPagerSource, HttpShortener, LinkShortener, PagerSource, Registry};
use crate::network::{Bot, OutputMultiplexer};
use crate::quotes::QuoteStore;
use crate::relay::{HttpFeedSource, RelayCommand, RelayHandle, StreamRelay};
use crate::state::BotState;
use eppo_proto::Color;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Outbound operations waiting for the writer.
const OUTPUT_QUEUE: usize = 256;
/// Relay lines waiting for the writer.
const RELAY_QUEUE: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "Refusing to start with {} configuration error(s). See error messages above.",
            errors.len()
        ));
    }

    info!(
        nick = %config.bot.nickname,
        server = %config.bot.server,
        channel = %config.bot.channel,
        "Starting eppobot"
    );

    let quotes = QuoteStore::load(&config.bot.quotefile).map_err(|e| {
        error!(path = %config.bot.quotefile, error = %e, "Failed to load quotes");
        e
    })?;
    if quotes.is_empty() {
        warn!(path = %config.bot.quotefile, "Quote file is empty");
    }
    let registry = Registry::new(&config.bot.nickname)?;
    let state = BotState::new(quotes, config.bot.seed);

    let (ops_tx, ops_rx) = mpsc::channel(OUTPUT_QUEUE);
    let (relay_tx, relay_rx) = mpsc::channel(RELAY_QUEUE);

    // Stream relay is optional; a broken settings file only disables it.
    let relay = match config.active_relay() {
        Some(relay_config) => {
            let source = HttpFeedSource::new(relay_config);
            match StreamRelay::spawn(source, &relay_config.config_path, relay_tx) {
                Ok(handle) => {
                    spawn_reload_on_hangup(handle.clone());
                    Some(handle)
                }
                Err(e) => {
                    warn!(path = %relay_config.config_path, error = %e, "Stream relay disabled");
                    None
                }
            }
        }
        None => {
            info!("Stream relay not configured");
            None
        }
    };

    let color = match config.active_relay() {
        Some(relay_config) if config.bot.colors => Color::from_code(relay_config.color),
        _ => None,
    };

    let shortener: Arc<dyn LinkShortener> =
        Arc::new(HttpShortener::new(config.shortener.endpoint.as_str()));
    let pager: Arc<dyn PagerSource> = Arc::new(HttpPagerSource::new(config.pager.url.as_str()));

    let config = Arc::new(config);
    let mut mux = OutputMultiplexer::new(ops_rx, relay_rx, config.bot.channel.as_str(), color);
    let mut bot = Bot::new(
        Arc::clone(&config),
        registry,
        state,
        ops_tx,
        relay,
        shortener,
        pager,
    );

    network::serve(&config.bot, &mut bot, &mut mux).await;

    info!("eppobot stopped");
    Ok(())
}

/// Re-read the relay settings on SIGHUP.
#[cfg(unix)]
fn spawn_reload_on_hangup(relay: RelayHandle) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            warn!(error = %e, "Failed to install SIGHUP handler");
            return;
        }
    };
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, rereading relay settings");
            relay.request(RelayCommand::RereadConfig);
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_relay: RelayHandle) {}
