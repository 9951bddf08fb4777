//! In-memory quote list backed by a JSON file.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::submission::{QuoteRejection, parse_submission};
use crate::error::StoreError;

/// One remembered saying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Text")]
    pub text: String,
}

impl Quote {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn name_contains(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
    }

    /// Case-insensitive substring match on the text.
    pub fn text_contains(&self, needle: &str) -> bool {
        contains_ignore_case(&self.text, needle)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `!undo` was used with nothing added since startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no quotes added since startup")]
pub struct UndoBlocked;

/// The quote database.
///
/// `initial_count` is the size at startup; undo never removes quotes below it.
#[derive(Debug)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    initial_count: usize,
    path: PathBuf,
}

impl QuoteStore {
    /// Load the quote file at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let quotes = read_quotes(&path)?;
        info!(path = %path.display(), count = quotes.len(), "Loaded quotes");
        Ok(Self::from_quotes(quotes, path))
    }

    /// Build a store from quotes already in memory.
    pub fn from_quotes(quotes: Vec<Quote>, path: impl Into<PathBuf>) -> Self {
        Self {
            initial_count: quotes.len(),
            quotes,
            path: path.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    #[cfg(test)]
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Pick a uniformly random quote among those matching `predicate`.
    pub fn random_matching<R, P>(&self, rng: &mut R, predicate: P) -> Option<&Quote>
    where
        R: Rng + ?Sized,
        P: Fn(&Quote) -> bool,
    {
        self.quotes.iter().filter(|q| predicate(q)).choose(rng)
    }

    /// Validate an `!addquote` payload and append it.
    ///
    /// The caller persists afterwards.
    pub fn append(&mut self, submission: &str) -> Result<&Quote, QuoteRejection> {
        let (name, text) = parse_submission(submission)?;
        self.quotes.push(Quote::new(name, text));
        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Remove the most recently added quote, if it was added since startup.
    pub fn undo_last(&mut self) -> Result<Quote, UndoBlocked> {
        if self.quotes.len() <= self.initial_count {
            return Err(UndoBlocked);
        }
        self.quotes.pop().ok_or(UndoBlocked)
    }

    /// Re-read the quote file. On failure the current list is kept.
    ///
    /// The undo baseline is left alone.
    pub fn reload(&mut self) -> Result<usize, StoreError> {
        self.quotes = read_quotes(&self.path)?;
        Ok(self.quotes.len())
    }

    /// Write the list to the quote file, tab indented.
    pub fn persist(&self) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.quotes.serialize(&mut serializer)?;
        std::fs::write(&self.path, buf)?;
        Ok(())
    }
}

fn read_quotes(path: &Path) -> Result<Vec<Quote>, StoreError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
