//! The live stream and the user directory behind it.
//!
//! [`FeedSource`] is the seam between the relay and the outside world; the
//! relay only ever sees lines and users. [`HttpFeedSource`] talks to the
//! real service.

use std::time::Duration;

use async_trait::async_trait;
use eppo_proto::FormattedStringExt;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::follow::FollowList;
use super::history::Tweet;
use super::settings::FeedSettings;
use crate::config::RelayConfig;
use crate::error::RelayError;

/// Timeout for directory lookups. The stream itself has no overall timeout.
const API_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Longest stream item accepted while waiting for its line break.
const MAX_ITEM_LEN: usize = 1 << 20;

/// An account in the user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedUser {
    #[serde(default)]
    pub id_str: String,
    #[serde(default)]
    pub screen_name: String,
}

/// One line of the stream. Anything that is not a status (deletions, limit
/// notices) comes out with empty fields.
#[derive(Debug, Default, Deserialize)]
struct StreamItem {
    #[serde(default)]
    user: FeedUser,
    #[serde(default)]
    id_str: String,
    #[serde(default)]
    text: String,
}

/// Parse one stream line into a relayable item.
///
/// Line breaks in the text become spaces and IRC formatting is stripped.
/// Items without an author or text yield `None`.
pub fn parse_item(line: &str) -> Result<Option<Tweet>, RelayError> {
    let item: StreamItem = serde_json::from_str(line)?;
    let text = item.text.replace(['\r', '\n'], " ");
    let text = text.as_str().strip_formatting();

    if item.user.screen_name.is_empty() || text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Tweet {
        author: item.user.screen_name,
        id: item.id_str,
        text: text.into_owned(),
    }))
}

/// An open stream connection.
#[async_trait]
pub trait FeedStream: Send {
    /// The next non-empty line. [`RelayError::ConnectionClosed`] once the
    /// stream has ended.
    async fn next_line(&mut self) -> Result<String, RelayError>;
}

/// The stream service and its user directory.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Open a stream filtered on `settings.follow`.
    async fn connect(&self, settings: &FeedSettings) -> Result<Box<dyn FeedStream>, RelayError>;

    /// Look up one account by its screen name.
    async fn user_by_name(&self, settings: &FeedSettings, name: &str)
    -> Result<FeedUser, RelayError>;

    /// Look up accounts by id.
    async fn users_by_ids(
        &self,
        settings: &FeedSettings,
        ids: &FollowList,
    ) -> Result<Vec<FeedUser>, RelayError>;
}

/// The stream service over HTTP, authenticated with the access token.
pub struct HttpFeedSource {
    http: reqwest::Client,
    stream_url: String,
    user_show_url: String,
    users_lookup_url: String,
    open_timeout: Duration,
}

impl HttpFeedSource {
    pub fn new(config: &RelayConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("eppobot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            stream_url: config.stream_url.clone(),
            user_show_url: config.user_show_url.clone(),
            users_lookup_url: config.users_lookup_url.clone(),
            open_timeout: config.open_timeout(),
        }
    }

    /// Send with auth and fail on non-success status.
    async fn send(
        &self,
        request: RequestBuilder,
        settings: &FeedSettings,
    ) -> Result<Response, RelayError> {
        let resp = request.bearer_auth(&settings.access_token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        settings: &FeedSettings,
    ) -> Result<T, RelayError> {
        let body = self.send(request, settings).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn connect(&self, settings: &FeedSettings) -> Result<Box<dyn FeedStream>, RelayError> {
        let request = self
            .http
            .post(&self.stream_url)
            .form(&[("follow", settings.follow.as_str())]);
        let response = tokio::time::timeout(self.open_timeout, self.send(request, settings))
            .await
            .map_err(|_| RelayError::OpenTimeout(self.open_timeout))??;
        debug!(url = %self.stream_url, "Stream opened");
        Ok(Box::new(HttpFeedStream {
            response,
            lines: LineBuffer::default(),
        }))
    }

    async fn user_by_name(
        &self,
        settings: &FeedSettings,
        name: &str,
    ) -> Result<FeedUser, RelayError> {
        let request = self
            .http
            .get(&self.user_show_url)
            .timeout(API_TIMEOUT)
            .query(&[("screen_name", name)]);
        self.fetch_json(request, settings).await
    }

    async fn users_by_ids(
        &self,
        settings: &FeedSettings,
        ids: &FollowList,
    ) -> Result<Vec<FeedUser>, RelayError> {
        let request = self
            .http
            .post(&self.users_lookup_url)
            .timeout(API_TIMEOUT)
            .form(&[("user_id", ids.to_string())]);
        self.fetch_json(request, settings).await
    }
}

/// Bytes received so far, handed out a line at a time.
#[derive(Debug, Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// The next non-blank complete line, if one is buffered.
    ///
    /// Fails once more than [`MAX_ITEM_LEN`] bytes pile up without a line
    /// break.
    fn next_line(&mut self) -> Result<Option<String>, RelayError> {
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw).trim().to_string();
            // Blank lines are keepalives.
            if !line.is_empty() {
                return Ok(Some(line));
            }
        }
        if self.buf.len() > MAX_ITEM_LEN {
            let len = self.buf.len();
            self.buf.clear();
            return Err(RelayError::ItemTooLarge(len));
        }
        Ok(None)
    }
}

/// A chunked HTTP body read as lines.
struct HttpFeedStream {
    response: Response,
    lines: LineBuffer,
}

#[async_trait]
impl FeedStream for HttpFeedStream {
    async fn next_line(&mut self) -> Result<String, RelayError> {
        loop {
            if let Some(line) = self.lines.next_line()? {
                return Ok(line);
            }
            match self.response.chunk().await? {
                Some(chunk) => self.lines.push(&chunk),
                None => return Err(RelayError::ConnectionClosed),
            }
        }
    }
}
