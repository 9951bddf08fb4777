//! Link shortening.
//!
//! Any chat line with a long enough link in it gets a short version posted
//! back. The lookup runs on its own task so a slow shortener never holds up
//! the protocol loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eppo_proto::Operation;
use tracing::{debug, warn};

use super::{Context, Groups, Handler};
use crate::error::{HandlerResult, ShortenError};

/// Timeout for shortener requests.
const SHORTEN_TIMEOUT: Duration = Duration::from_secs(10);

/// A service that turns a long URL into a short one.
#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, url: &str) -> Result<String, ShortenError>;
}

/// Shortener reached over HTTP as `GET <endpoint>?url=<link>`.
///
/// The response body, trimmed, is the short link.
pub struct HttpShortener {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpShortener {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SHORTEN_TIMEOUT)
            .user_agent(concat!("eppobot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LinkShortener for HttpShortener {
    async fn shorten(&self, url: &str) -> Result<String, ShortenError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ShortenError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let short = body.trim();
        if short.is_empty() {
            return Err(ShortenError::Empty);
        }
        Ok(short.to_string())
    }
}

/// The first whitespace-separated token that starts with `http` and is
/// longer than `min_len` bytes.
pub fn long_link(text: &str, min_len: usize) -> Option<&str> {
    text.split_whitespace()
        .find(|token| token.starts_with("http") && token.len() > min_len)
}

/// Handler for chat lines containing `http`.
pub struct ShortenHandler;

#[async_trait]
impl Handler for ShortenHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let Some(link) = long_link(&ctx.msg.text, ctx.config.url_length) else {
            return Ok(());
        };

        let link = link.to_string();
        let channel = ctx.msg.channel.clone();
        let shortener = Arc::clone(ctx.shortener);
        let out = ctx.out.clone();

        tokio::spawn(async move {
            match shortener.shorten(&link).await {
                Ok(short) => {
                    debug!(link = %link, short = %short, "Link shortened");
                    if out.send(Operation::reply(channel, short)).await.is_err() {
                        debug!("Output closed before short link was sent");
                    }
                }
                Err(e) => warn!(link = %link, error = %e, "Failed to shorten link"),
            }
        });

        Ok(())
    }
}
