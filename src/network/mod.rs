//! Network module.
//!
//! Contains the server connection, the protocol loop, the output multiplexer
//! and the reconnect loop that ties them together.

mod connection;
mod output;
mod protocol_loop;
mod scheduler;

pub use output::OutputMultiplexer;
pub use protocol_loop::{Bot, SessionEnd};
pub use scheduler::Scheduler;

use std::time::Duration;

use tracing::{Instrument, error, info, info_span, warn};

use crate::config::BotConfig;
use connection::connect;

/// Pause between a lost session and the next connection attempt.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Keep the bot connected until it is told to leave.
///
/// Each session races the protocol loop against the output multiplexer; the
/// first to finish ends the session. Only a deliberate shutdown returns.
pub async fn serve(config: &BotConfig, bot: &mut Bot, mux: &mut OutputMultiplexer) {
    let mut session: u64 = 0;

    'reconnect_loop: loop {
        let (mut reader, mut writer) = match connect(config).await {
            Ok(halves) => halves,
            Err(e) => {
                error!(error = %e, "Connection failed. Retrying in 5s...");
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };
        session += 1;

        let end = async {
            tokio::select! {
                end = bot.run(&mut reader) => end,
                e = mux.run(&mut writer) => SessionEnd::Lost(e),
            }
        }
        .instrument(info_span!("session", id = session, server = %config.server))
        .await;

        match end {
            SessionEnd::Shutdown => {
                if let Err(e) = mux.drain(&mut writer).await {
                    warn!(error = %e, "Failed to flush output on shutdown");
                }
                info!("Disconnected on request");
                break 'reconnect_loop;
            }
            SessionEnd::Lost(e) => {
                warn!(error = %e, session, "Session ended. Reconnecting in 5s...");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
