//! Classification of inbound server lines.
//!
//! The bot only reacts to a handful of commands, so instead of a full message
//! model a line is split into prefix, verb and parameters and then mapped onto
//! the [`Inbound`] variants the bot cares about. Everything else is
//! [`Inbound::Other`]; lines that cannot be split at all yield `None`.

/// An inbound line, reduced to what the bot acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// `PING <token>`; the token is kept in wire form for the `PONG`.
    Ping(String),
    /// A message to a channel or to the bot.
    Privmsg {
        /// Nickname of the sender.
        sender: String,
        /// Channel name, or the bot's own nickname for private queries.
        target: String,
        /// Message body with surrounding whitespace removed.
        text: String,
    },
    /// An invitation to join `channel`.
    Invite {
        /// Channel the bot was invited to.
        channel: String,
    },
    /// A user (possibly the bot itself) joined a channel.
    Join {
        /// Nickname of the joining user.
        nick: String,
        /// Channel joined.
        channel: String,
    },
    /// `001 RPL_WELCOME`: registration completed.
    Welcome,
    /// `433 ERR_NICKNAMEINUSE`.
    NickInUse,
    /// `353 RPL_NAMREPLY`: one batch of channel members, with status prefixes.
    NamesReply {
        /// Channel the names belong to.
        channel: String,
        /// Members as sent, e.g. `@alice` or `bob`.
        names: Vec<String>,
    },
    /// `366 RPL_ENDOFNAMES`.
    EndOfNames {
        /// Channel whose listing ended.
        channel: String,
    },
    /// A well-formed line the bot does not act on.
    Other,
}

impl Inbound {
    /// Classify one line without its terminator.
    ///
    /// Returns `None` for lines that are malformed, including known commands
    /// missing the parameters the bot needs.
    pub fn parse(line: &str) -> Option<Inbound> {
        let raw = RawLine::split(line)?;
        let param = |i: usize| raw.params.get(i).copied();

        let inbound = match raw.verb {
            "PING" => Inbound::Ping(raw.args.to_string()),
            "PRIVMSG" => Inbound::Privmsg {
                sender: raw.nick()?.to_string(),
                target: param(0)?.to_string(),
                text: param(1)?.trim().to_string(),
            },
            "INVITE" => Inbound::Invite {
                channel: raw.params.last()?.to_string(),
            },
            "JOIN" => Inbound::Join {
                nick: raw.nick()?.to_string(),
                channel: param(0)?.to_string(),
            },
            "001" => Inbound::Welcome,
            "433" => Inbound::NickInUse,
            "353" => {
                // <me> [symbol] <channel> :<names>
                let n = raw.params.len();
                if n < 3 {
                    return None;
                }
                Inbound::NamesReply {
                    channel: raw.params[n - 2].to_string(),
                    names: raw.params[n - 1]
                        .split_whitespace()
                        .map(str::to_string)
                        .collect(),
                }
            }
            "366" => Inbound::EndOfNames {
                channel: param(1)?.to_string(),
            },
            _ => Inbound::Other,
        };
        Some(inbound)
    }
}

/// A line split into its parts, borrowing from the input.
struct RawLine<'a> {
    prefix: Option<&'a str>,
    verb: &'a str,
    /// Everything after the verb, verbatim.
    args: &'a str,
    params: Vec<&'a str>,
}

impl<'a> RawLine<'a> {
    fn split(line: &'a str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']).trim_start();

        // IRCv3 message tags carry nothing the bot uses.
        if rest.starts_with('@') {
            rest = rest.split_once(' ')?.1.trim_start();
        }

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, tail) = stripped.split_once(' ')?;
                rest = tail.trim_start();
                Some(prefix)
            }
            None => None,
        };

        let (verb, args) = match rest.split_once(' ') {
            Some((verb, args)) => (verb, args.trim_start()),
            None => (rest, ""),
        };
        if verb.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        let mut tail = args;
        while !tail.is_empty() {
            if let Some(trailing) = tail.strip_prefix(':') {
                params.push(trailing);
                break;
            }
            match tail.split_once(' ') {
                Some((param, more)) => {
                    params.push(param);
                    tail = more.trim_start();
                }
                None => {
                    params.push(tail);
                    break;
                }
            }
        }

        Some(RawLine {
            prefix,
            verb,
            args,
            params,
        })
    }

    /// Nickname part of the prefix, the whole prefix when it has no `!`.
    fn nick(&self) -> Option<&'a str> {
        let prefix = self.prefix?;
        let nick = prefix.split_once('!').map_or(prefix, |(nick, _)| nick);
        (!nick.is_empty()).then_some(nick)
    }
}
