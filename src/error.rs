//! Unified error handling for eppobot.
//!
//! One `thiserror` hierarchy per concern. Only transport failures end a
//! session; everything else is logged where it happens and the bot carries on.

use eppo_proto::{Operation, ProtocolError};
use thiserror::Error;
use tokio::sync::mpsc;

// ============================================================================
// Bot Errors (session level)
// ============================================================================

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("failed to connect to {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection closed by server")]
    ConnectionClosed,

    #[error("output queue closed")]
    OutputClosed,
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
///
/// Both variants end the session; [`HandlerError::Shutdown`] also ends the
/// process.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The bot was told to leave.
    #[error("shutdown requested")]
    Shutdown,

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Operation>),
}

impl HandlerError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Send(_) => "send_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Store Errors (quote file)
// ============================================================================

/// Quote file read/write errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("quote file io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("quote file is not a list of {{\"Name\": ..., \"Text\": ...}} objects: {0}")]
    Format(#[from] serde_json::Error),
}

// ============================================================================
// Relay Errors (stream and directory API)
// ============================================================================

/// Stream relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected api response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("relay settings io error: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("failed to parse relay settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("failed to write relay settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error("stream did not answer within {0:?}")]
    OpenTimeout(std::time::Duration),

    #[error("stream item exceeds {0} bytes without a line break")]
    ItemTooLarge(usize),

    /// The stream ended; a normal reason to reconnect.
    #[error("stream connection closed")]
    ConnectionClosed,
}

impl RelayError {
    /// Whether this is an ordinary end of stream rather than a failure.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
    }
}

// ============================================================================
// Shortener Errors
// ============================================================================

/// URL shortening failures. Never shown in the channel.
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("shortener returned status {0}")]
    Status(u16),

    #[error("shortener returned an empty body")]
    Empty,
}

// ============================================================================
// Pager Errors
// ============================================================================

/// Pager page fetch failures. Never shown in the channel.
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("pager page returned status {0}")]
    Status(u16),
}
