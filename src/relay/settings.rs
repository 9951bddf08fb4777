//! The relay's own settings file.
//!
//! Kept apart from the main configuration because the relay rewrites it
//! every time the follow list changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Stream credentials and the accounts to follow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSettings {
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Comma separated account ids.
    #[serde(default)]
    pub follow: String,
    pub access_token: String,
    pub access_secret: String,
}

impl FeedSettings {
    pub fn load(path: &Path) -> Result<Self, RelayError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), RelayError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
