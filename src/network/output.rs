//! The output multiplexer: the only writer to the socket.
//!
//! Bot operations and relay lines arrive on separate queues and are written
//! one whole line at a time, so concurrent producers never interleave.

use eppo_proto::{Color, Operation, ProtocolError};
use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::BotError;

/// Fan-in of bot operations and relay lines onto one writer.
///
/// The receivers outlive connections: after a reconnect the multiplexer picks
/// up where it left off.
pub struct OutputMultiplexer {
    ops: mpsc::Receiver<Operation>,
    relay_lines: mpsc::Receiver<String>,
    /// Channel relay lines are posted to.
    channel: String,
    color: Option<Color>,
}

impl OutputMultiplexer {
    pub fn new(
        ops: mpsc::Receiver<Operation>,
        relay_lines: mpsc::Receiver<String>,
        channel: impl Into<String>,
        color: Option<Color>,
    ) -> Self {
        Self {
            ops,
            relay_lines,
            channel: channel.into(),
            color,
        }
    }

    /// Write until the writer fails or every producer is gone.
    pub async fn run<W>(&mut self, writer: &mut W) -> BotError
    where
        W: Sink<String, Error = ProtocolError> + Unpin,
    {
        loop {
            let op = tokio::select! {
                Some(op) = self.ops.recv() => op,
                Some(line) = self.relay_lines.recv() => self.relay_reply(line),
                else => return BotError::OutputClosed,
            };
            if let Err(e) = write(writer, op).await {
                return e;
            }
        }
    }

    /// Flush queued bot operations, then close the writer.
    ///
    /// Used on shutdown so the `QUIT` reaches the server.
    pub async fn drain<W>(&mut self, writer: &mut W) -> Result<(), BotError>
    where
        W: Sink<String, Error = ProtocolError> + Unpin,
    {
        while let Ok(op) = self.ops.try_recv() {
            write(writer, op).await?;
        }
        writer.close().await?;
        Ok(())
    }

    fn relay_reply(&self, line: String) -> Operation {
        let text = match self.color {
            Some(color) => color.paint(&line),
            None => line,
        };
        Operation::reply(&self.channel, text)
    }
}

async fn write<W>(writer: &mut W, op: Operation) -> Result<(), BotError>
where
    W: Sink<String, Error = ProtocolError> + Unpin,
{
    let line = op.to_string();
    if op.kind() != "PONG" {
        info!(line = %line, ">>");
    }
    match writer.send(line).await {
        Ok(()) => Ok(()),
        Err(ProtocolError::EmbeddedNewline(line)) => {
            warn!(line = %line, "Dropping outbound line with a line break");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
