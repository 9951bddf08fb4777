//! Connection to the chat server.
//!
//! The socket is split so the protocol loop owns the read half and the
//! output multiplexer owns the write half; both speak through [`LineCodec`].

use eppo_proto::LineCodec;
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::info;

use crate::config::BotConfig;
use crate::error::BotError;

/// Inbound half: one decoded line per item.
pub type LineReader = FramedRead<OwnedReadHalf, LineCodec>;
/// Outbound half: one line per sent `String`.
pub type LineWriter = FramedWrite<OwnedWriteHalf, LineCodec>;

/// Connect to the configured server and register.
///
/// Registration is only sent here; `001` and `433` are handled by the
/// protocol loop.
pub async fn connect(config: &BotConfig) -> Result<(LineReader, LineWriter), BotError> {
    let stream = TcpStream::connect(&config.server)
        .await
        .map_err(|source| BotError::Connect {
            server: config.server.clone(),
            source,
        })?;
    let peer = stream.peer_addr().ok();
    let (read, write) = stream.into_split();

    let reader = FramedRead::new(read, LineCodec::new());
    let mut writer = FramedWrite::new(write, LineCodec::new());

    writer
        .send(format!("USER {} 8 * :{}", config.nickname, config.realname))
        .await?;
    writer.send(format!("NICK {}", config.nickname)).await?;

    info!(server = %config.server, peer = ?peer, nick = %config.nickname, "Connected, registration sent");
    Ok((reader, writer))
}
