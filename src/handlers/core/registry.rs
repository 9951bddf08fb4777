//! Command pattern registry and dispatch.
//!
//! The `Registry` holds an ordered list of (pattern, handler) bindings built
//! once at startup. Messages are matched against the patterns in order and
//! only the first match is handled.

use regex::Regex;
use tracing::{Instrument, Level, debug, span};

use super::context::{Context, Groups};
use super::traits::Handler;
use crate::error::HandlerResult;
use crate::handlers::{
    bridge::{FixStreamHandler, FollowHandler, FollowingHandler, LinkHandler, UnfollowHandler},
    control::{DisconnectHandler, OpsHandler, RawHandler},
    fun::{BanterHandler, ButterflyHandler, CannedHandler, MeasureHandler, TrainHandler},
    lookup::{PagerHandler, WhereIsHandler},
    quotes::{
        AddQuoteHandler, CollageHandler, CollegeHandler, QueryFilter, QuoteQueryHandler,
        ReloadHandler, SelfQuoteHandler, UndoHandler,
    },
    shortener::ShortenHandler,
};

/// A pattern and the handler it triggers.
pub struct Binding {
    name: &'static str,
    pattern: Regex,
    handler: Box<dyn Handler>,
}

/// Ordered registry of command handlers.
pub struct Registry {
    bindings: Vec<Binding>,
}

impl Registry {
    /// Create a registry with all handlers bound.
    ///
    /// `nickname` is the configured bot nickname; commands addressed to the
    /// bot match it literally.
    pub fn new(nickname: &str) -> Result<Self, regex::Error> {
        let nick = regex::escape(nickname);
        let mut registry = Self {
            bindings: Vec::new(),
        };

        // Leaving comes before everything else
        registry.bind(
            "disconnect",
            &format!("^{nick}: verdwijn"),
            DisconnectHandler,
        )?;

        // Quote queries
        registry.bind(
            "collega",
            r"^!collega$",
            QuoteQueryHandler::new(QueryFilter::Any),
        )?;
        registry.bind(
            "collega_name",
            r"^!collega (.*)$",
            QuoteQueryHandler::new(QueryFilter::Name),
        )?;
        registry.bind(
            "wiezei",
            r"^!wiezei (.*)$",
            QuoteQueryHandler::new(QueryFilter::Text),
        )?;
        registry.bind(
            "watzei",
            r"^!watzei (.*) over (.*)$",
            QuoteQueryHandler::new(QueryFilter::NameAndText),
        )?;
        registry.bind("college", r"^!college$", CollegeHandler)?;
        registry.bind("collage", r"^!collage$", CollageHandler)?;
        registry.bind("janeppo", r"^!janeppo$", SelfQuoteHandler)?;

        // Quote mutation
        registry.bind("addquote", r"^!addquote (.*)$", AddQuoteHandler)?;
        registry.bind("undo", r"^!undo$", UndoHandler)?;
        registry.bind("herlaad", r"^!herlaad$", ReloadHandler)?;

        // Easter eggs
        registry.bind("pikk", r"^!pikk$", MeasureHandler::attachment())?;
        registry.bind("ijbepikk", r"^!ijbepikk$", MeasureHandler::frustration())?;
        registry.bind("gang", r"^gang", CannedHandler::new("GANG!!!"))?;
        registry.bind("lazer", r"(?i)^lazer", CannedHandler::new("LAZERS!"))?;
        registry.bind("sl", r"^!sl$", TrainHandler)?;
        registry.bind("butterfly", r"^!butterfly$", ButterflyHandler)?;

        // Lookups
        registry.bind("waaris", r"^!waaris (.*)$", WhereIsHandler)?;
        registry.bind("sikknel", r"^!sikknel$", PagerHandler)?;

        // Bot control
        registry.bind("raw", r"^!raw ([^ ]*) (.*)$", RawHandler)?;
        registry.bind("ops", r"^!ops$", OpsHandler)?;

        // Stream relay bridge
        registry.bind("fixtwitter", r"^!fixtwitter$", FixStreamHandler)?;
        registry.bind("follow", r"^!follow(?: (.*))?$", FollowHandler)?;
        registry.bind("unfollow", r"^!unfollow(?: (.*))?$", UnfollowHandler)?;
        registry.bind("following", r"^!following$", FollowingHandler)?;
        registry.bind("link", r"^!link(?: (.*))?$", LinkHandler)?;

        // Anything with a link in it
        registry.bind("shorten", r"http", ShortenHandler)?;

        // Everything else addressed to the bot
        registry.bind("banter", &format!("^{nick}: "), BanterHandler)?;

        Ok(registry)
    }

    fn bind(
        &mut self,
        name: &'static str,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<(), regex::Error> {
        self.bindings.push(Binding {
            name,
            pattern: Regex::new(pattern)?,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Binding names in match order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.iter().map(|b| b.name)
    }

    /// Find the first binding matching `text`.
    pub fn route(&self, text: &str) -> Option<(&Binding, Groups)> {
        self.bindings.iter().find_map(|binding| {
            binding
                .pattern
                .captures(text)
                .map(|caps| (binding, Groups::from_captures(&caps)))
        })
    }

    /// Dispatch a chat message to the first matching handler.
    ///
    /// Messages matching no pattern are ignored.
    pub async fn dispatch(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let Some((binding, groups)) = self.route(&ctx.msg.text) else {
            return Ok(());
        };

        let command_span = span!(
            Level::DEBUG,
            "bot.command",
            command = binding.name,
            sender = %ctx.msg.sender,
            channel = %ctx.msg.channel,
        );

        let result = binding
            .handler
            .handle(ctx, &groups)
            .instrument(command_span)
            .await;

        if let Err(ref e) = result {
            debug!(command = binding.name, error = %e, code = e.error_code(), "Command ended session");
        }
        result
    }
}

impl Binding {
    pub fn name(&self) -> &'static str {
        self.name
    }
}
