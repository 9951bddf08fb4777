//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_url_length() -> usize {
    60
}

pub fn default_realname() -> String {
    "Go Bot".to_string()
}

pub fn default_butterfly_delay() -> u64 {
    120
}

// =============================================================================
// Shortener Defaults
// =============================================================================

pub fn default_shortener_endpoint() -> String {
    "http://nazr.in/api/shorten".to_string()
}

// =============================================================================
// Pager Defaults
// =============================================================================

pub fn default_pager_url() -> String {
    "http://www.p2000zhz-rr.nl/p2000-brandweer-groningen.html".to_string()
}

// =============================================================================
// Relay Defaults
// =============================================================================

pub fn default_relay_config_path() -> String {
    "twitter.toml".to_string()
}

pub fn default_stream_url() -> String {
    "https://stream.twitter.com/1.1/statuses/filter.json".to_string()
}

pub fn default_user_show_url() -> String {
    "https://api.twitter.com/1.1/users/show.json".to_string()
}

pub fn default_users_lookup_url() -> String {
    "https://api.twitter.com/1.1/users/lookup.json".to_string()
}

pub fn default_stream_open_timeout() -> u64 {
    30
}

/// Cyan in the mIRC palette.
pub fn default_relay_color() -> u8 {
    10
}
