//! Outbound operations.
//!
//! Everything the bot writes to the server is an [`Operation`]: either a
//! message to a channel or user, or a raw command line.

use std::fmt;

/// A single outbound protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A message to a channel or user, rendered as `PRIVMSG <channel> :<text>`.
    Reply {
        /// Channel name or nickname the message is sent to.
        channel: String,
        /// Message body.
        text: String,
    },
    /// A raw command, rendered as `<verb> <arguments>`.
    Raw {
        /// Command verb, e.g. `JOIN` or `MODE`.
        verb: String,
        /// Everything after the verb, already in wire form.
        arguments: String,
    },
}

impl Operation {
    /// Build a message to `channel`.
    pub fn reply(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Operation::Reply {
            channel: channel.into(),
            text: text.into(),
        }
    }

    /// Build a raw command line.
    pub fn raw(verb: impl Into<String>, arguments: impl Into<String>) -> Self {
        Operation::Raw {
            verb: verb.into(),
            arguments: arguments.into(),
        }
    }

    /// The command verb of this operation; `PRIVMSG` for replies.
    pub fn kind(&self) -> &str {
        match self {
            Operation::Reply { .. } => "PRIVMSG",
            Operation::Raw { verb, .. } => verb,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Reply { channel, text } => write!(f, "PRIVMSG {channel} :{text}"),
            Operation::Raw { verb, arguments } if arguments.is_empty() => f.write_str(verb),
            Operation::Raw { verb, arguments } => write!(f, "{verb} {arguments}"),
        }
    }
}
