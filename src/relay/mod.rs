//! Stream relay.
//!
//! A single task that keeps a live stream open, relays every item into the
//! channel and answers the follow-list requests that the bridge handlers
//! forward. The stream is never fatal: any read error or end of stream is a
//! disconnect, and the relay connects again.
//!
//! ```text
//!  bridge handlers ──RelayCommand──▶ ┌─────────────┐ ──String──▶ output multiplexer
//!  SIGHUP ─────────RereadConfig────▶ │ StreamRelay │
//!  FeedSource ─────lines──────────▶ └─────────────┘
//! ```

mod feed;
mod follow;
mod history;
mod settings;

pub use feed::{FeedSource, FeedStream, FeedUser, HttpFeedSource};
pub use follow::FollowList;
pub use history::TweetHistory;
pub use settings::FeedSettings;

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, warn};

use crate::error::RelayError;

/// Pause between failed connection attempts.
const RETRY_DELAY: Duration = Duration::from_secs(5);
/// How often the history is compacted.
const COMPACT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Queue size of the control channel.
const CONTROL_QUEUE: usize = 32;

const HELP_LINK: &str = "Als ik tweets heb herhaald, kun je een link opvragen naar de laatste tweet met '!link', of een link naar de laatste tweet van bijvoorbeeld @ineke met '!link ineke'.";
const INEKE: &str = "Inderdaad. Jammer dat ze niet op Twitter zit hè..";
const UNKNOWN_AUTHOR: &str =
    "Welnu, ik word misschien wat ouder, maar van die gebruiker heb ik nog nooit gehoord.";
const UNKNOWN_PERSON: &str = "Die persoon ken ik niet.";
const STREAM_DOWN: &str = "Walvissen vallen het schip aan!";

/// Requests the relay accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCommand {
    /// Drop the stream and connect again.
    Reconnect,
    /// Re-read the settings file, then reconnect.
    RereadConfig,
    /// Follow an account by screen name.
    Follow(String),
    /// Stop following an account by screen name.
    Unfollow(String),
    /// Post the followed accounts.
    ListFollows,
    /// Post a link to the newest item by an author matching the query.
    OutputLink(String),
}

/// Sending side of the relay's control channel.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    pub fn new(tx: mpsc::Sender<RelayCommand>) -> Self {
        Self { tx }
    }

    /// Queue a request without waiting; dropped with a warning if the relay
    /// is busy or gone.
    pub fn request(&self, command: RelayCommand) {
        if let Err(e) = self.tx.try_send(command) {
            warn!(error = %e, "Stream relay not accepting requests");
        }
    }
}

/// What woke the relay up.
enum Event {
    Control(Option<RelayCommand>),
    Line(Result<String, RelayError>),
    Compact,
    Retry,
}

/// The relay task.
pub struct StreamRelay<F> {
    source: F,
    settings: FeedSettings,
    settings_path: PathBuf,
    history: TweetHistory,
    control: mpsc::Receiver<RelayCommand>,
    output: mpsc::Sender<String>,
}

impl<F: FeedSource + 'static> StreamRelay<F> {
    /// Load the settings file and start the relay on its own task.
    ///
    /// Fails only when the settings cannot be read; the stream itself is
    /// connected in the background.
    pub fn spawn(
        source: F,
        settings_path: impl Into<PathBuf>,
        output: mpsc::Sender<String>,
    ) -> Result<RelayHandle, RelayError> {
        let settings_path = settings_path.into();
        let settings = FeedSettings::load(&settings_path)?;
        let (tx, control) = mpsc::channel(CONTROL_QUEUE);

        let relay = Self {
            source,
            settings,
            settings_path,
            history: TweetHistory::default(),
            control,
            output,
        };
        tokio::spawn(relay.run());
        Ok(RelayHandle::new(tx))
    }

    /// Run until every [`RelayHandle`] is gone.
    pub async fn run(mut self) {
        let mut compaction = interval_at(Instant::now() + COMPACT_INTERVAL, COMPACT_INTERVAL);
        let mut stream: Option<Box<dyn FeedStream>> = None;
        let mut next_attempt = Instant::now();
        let mut failing = false;

        info!(path = %self.settings_path.display(), "Stream relay started");

        loop {
            if stream.is_none() && Instant::now() >= next_attempt {
                match self.source.connect(&self.settings).await {
                    Ok(connected) => {
                        info!("Stream connected");
                        failing = false;
                        stream = Some(connected);
                    }
                    Err(e) => {
                        warn!(error = %e, "Stream connection failed. Retrying in 5s...");
                        next_attempt = Instant::now() + RETRY_DELAY;
                        if !failing {
                            failing = true;
                            self.say(STREAM_DOWN).await;
                        }
                    }
                }
            }

            let event = match stream.as_mut() {
                Some(open) => tokio::select! {
                    command = self.control.recv() => Event::Control(command),
                    line = open.next_line() => Event::Line(line),
                    _ = compaction.tick() => Event::Compact,
                },
                None => tokio::select! {
                    command = self.control.recv() => Event::Control(command),
                    _ = tokio::time::sleep_until(next_attempt) => Event::Retry,
                    _ = compaction.tick() => Event::Compact,
                },
            };

            match event {
                Event::Control(None) => {
                    info!("Stream relay stopped");
                    return;
                }
                Event::Control(Some(command)) => {
                    if self.handle(command).await {
                        stream = None;
                        next_attempt = Instant::now();
                    }
                }
                Event::Line(Ok(line)) => self.accept(&line).await,
                Event::Line(Err(e)) => {
                    if e.is_disconnect() {
                        info!("Stream closed. Reconnecting in 5s...");
                    } else {
                        warn!(error = %e, "Stream read failed. Reconnecting in 5s...");
                    }
                    stream = None;
                    next_attempt = Instant::now() + RETRY_DELAY;
                }
                Event::Compact => {
                    let removed = self.history.compact();
                    info!(removed, remaining = self.history.len(), "Compacted stream history");
                }
                Event::Retry => {}
            }
        }
    }

    /// Handle one request. Returns true when the stream must be reopened.
    async fn handle(&mut self, command: RelayCommand) -> bool {
        debug!(?command, "Relay request");
        match command {
            RelayCommand::Reconnect => {
                info!("Reconnect requested");
                true
            }
            RelayCommand::RereadConfig => {
                match FeedSettings::load(&self.settings_path) {
                    Ok(settings) => {
                        info!(path = %self.settings_path.display(), "Relay settings reloaded");
                        self.settings = settings;
                    }
                    Err(e) => {
                        warn!(error = %e, path = %self.settings_path.display(), "Failed to reload relay settings");
                    }
                }
                true
            }
            RelayCommand::Follow(name) => self.follow(&name).await,
            RelayCommand::Unfollow(name) => self.unfollow(&name).await,
            RelayCommand::ListFollows => {
                self.list_follows().await;
                false
            }
            RelayCommand::OutputLink(query) => {
                self.output_link(&query).await;
                false
            }
        }
    }

    async fn lookup(&self, name: &str) -> Option<FeedUser> {
        match self.source.user_by_name(&self.settings, name).await {
            Ok(user) if !user.id_str.is_empty() => Some(user),
            Ok(_) => {
                warn!(name = %name, "User lookup returned no id");
                None
            }
            Err(e) => {
                warn!(name = %name, error = %e, "User lookup failed");
                None
            }
        }
    }

    async fn follow(&mut self, name: &str) -> bool {
        let Some(user) = self.lookup(name).await else {
            self.say(UNKNOWN_PERSON).await;
            return false;
        };

        let mut follows = FollowList::parse(&self.settings.follow);
        if !follows.add(&user.id_str) {
            self.say("Die volg ik al.").await;
            return false;
        }

        info!(name = %user.screen_name, id = %user.id_str, "Following");
        self.store_follows(&follows);
        true
    }

    async fn unfollow(&mut self, name: &str) -> bool {
        let Some(user) = self.lookup(name).await else {
            self.say(UNKNOWN_PERSON).await;
            return false;
        };

        let mut follows = FollowList::parse(&self.settings.follow);
        if !follows.remove(&user.id_str) {
            self.say("Die persoon volg ik niet.").await;
            return false;
        }

        info!(name = %user.screen_name, id = %user.id_str, "Unfollowing");
        self.store_follows(&follows);
        true
    }

    /// Update the follow list and write the settings file. A failed write
    /// is logged; the new list is used either way.
    fn store_follows(&mut self, follows: &FollowList) {
        self.settings.follow = follows.to_string();
        if let Err(e) = self.settings.save(&self.settings_path) {
            warn!(error = %e, path = %self.settings_path.display(), "Failed to save relay settings");
        }
    }

    async fn list_follows(&self) {
        let follows = FollowList::parse(&self.settings.follow);
        if follows.is_empty() {
            debug!("Follow list is empty");
            return;
        }
        match self.source.users_by_ids(&self.settings, &follows).await {
            Ok(users) => {
                let names: Vec<String> = users
                    .iter()
                    .map(|user| format!("@{}", user.screen_name))
                    .collect();
                self.say(&names.join(", ")).await;
            }
            Err(e) => warn!(error = %e, "Failed to look up followed users"),
        }
    }

    async fn output_link(&self, query: &str) {
        if self.history.is_empty() {
            self.say(HELP_LINK).await;
            return;
        }
        if query == "ineke" {
            self.say(INEKE).await;
            return;
        }
        match self.history.find_link(query) {
            Some(link) => self.say(&link).await,
            None => self.say(UNKNOWN_AUTHOR).await,
        }
    }

    async fn accept(&mut self, line: &str) {
        match feed::parse_item(line) {
            Ok(Some(tweet)) => {
                let text = format!("[@{}] {}", tweet.author, tweet.text);
                self.history.push(tweet);
                self.say(&text).await;
            }
            Ok(None) => debug!("Ignoring stream item without author or text"),
            Err(e) => debug!(error = %e, "Ignoring unparseable stream line"),
        }
    }

    async fn say(&self, text: &str) {
        if self.output.send(text.to_string()).await.is_err() {
            debug!("Output closed, relay line dropped");
        }
    }
}
