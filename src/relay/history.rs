//! Relayed items, remembered for `!link`.

use std::collections::HashSet;

/// Upper bound on remembered items between compactions.
pub const HISTORY_CAP: usize = 1000;

/// One relayed stream item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub author: String,
    pub id: String,
    pub text: String,
}

impl Tweet {
    pub fn link(&self) -> String {
        format!("https://twitter.com/{}/status/{}", self.author, self.id)
    }
}

/// Received items, oldest first.
///
/// Compaction keeps the newest item of every author plus the newest item
/// overall, so `!link` without an argument always finds the latest one.
#[derive(Debug)]
pub struct TweetHistory {
    items: Vec<Tweet>,
    cap: usize,
}

impl Default for TweetHistory {
    fn default() -> Self {
        Self::with_cap(HISTORY_CAP)
    }
}

impl TweetHistory {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap: cap.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, tweet: Tweet) {
        self.items.push(tweet);
        if self.items.len() > self.cap {
            self.compact();
            // Many distinct authors; fall back to dropping the oldest.
            let excess = self.items.len().saturating_sub(self.cap);
            self.items.drain(..excess);
        }
    }

    /// Keep one item per author, plus the newest item. Returns how many
    /// items were dropped.
    pub fn compact(&mut self) -> usize {
        let before = self.items.len();
        if before < 2 {
            return 0;
        }
        let Some(newest) = self.items.pop() else {
            return 0;
        };

        let mut seen = HashSet::new();
        let mut kept: Vec<Tweet> = self
            .items
            .drain(..)
            .rev()
            .filter(|t| t.author != newest.author && seen.insert(t.author.clone()))
            .collect();
        kept.reverse();
        kept.push(newest);

        self.items = kept;
        before - self.items.len()
    }

    /// Link to the newest item whose author contains `query`.
    ///
    /// An empty query matches the newest item.
    pub fn find_link(&self, query: &str) -> Option<String> {
        self.items
            .iter()
            .rev()
            .find(|t| t.author.contains(query))
            .map(Tweet::link)
    }

    #[cfg(test)]
    fn authors(&self) -> Vec<&str> {
        self.items.iter().map(|t| t.author.as_str()).collect()
    }
}
