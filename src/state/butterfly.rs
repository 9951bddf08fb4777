//! Op toggles waiting for the server's `NAMES` listing.
//!
//! `!butterfly` either kicks the sender or flips their operator status. The
//! flip direction depends on whether they currently have ops, which the bot
//! learns from the `353` lines that follow its `NAMES` request; the `366`
//! that ends the listing settles the toggle.

use eppo_proto::Operation;

/// Membership prefixes a server may put in front of a nickname.
const STATUS_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingToggle {
    channel: String,
    nick: String,
    has_ops: bool,
}

/// Pending op toggles keyed by channel.
#[derive(Debug, Default)]
pub struct ButterflyBook {
    pending: Vec<PendingToggle>,
}

impl ButterflyBook {
    /// Start tracking a toggle for `nick` in `channel`.
    pub fn request(&mut self, channel: &str, nick: &str) {
        self.pending.push(PendingToggle {
            channel: channel.to_string(),
            nick: nick.to_string(),
            has_ops: false,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Feed one `353` batch.
    pub fn observe_names(&mut self, channel: &str, names: &[String]) {
        for toggle in self
            .pending
            .iter_mut()
            .filter(|t| t.channel.eq_ignore_ascii_case(channel))
        {
            if names.iter().any(|entry| is_op_entry(entry, &toggle.nick)) {
                toggle.has_ops = true;
            }
        }
    }

    /// Settle every toggle for `channel` on `366`, returning the mode changes.
    pub fn resolve(&mut self, channel: &str) -> Vec<Operation> {
        let (done, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.channel.eq_ignore_ascii_case(channel));
        self.pending = waiting;

        done.into_iter()
            .map(|t| {
                let flip = if t.has_ops { "-o" } else { "+o" };
                Operation::raw("MODE", format!("{} {} {}", t.channel, flip, t.nick))
            })
            .collect()
    }
}

fn is_op_entry(entry: &str, nick: &str) -> bool {
    let bare = entry.trim_start_matches(STATUS_PREFIXES);
    let prefixes = &entry[..entry.len() - bare.len()];
    bare == nick && prefixes.contains('@')
}
