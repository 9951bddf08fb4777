//! Quote handlers: !collega, !wiezei, !watzei, !college, !collage, !janeppo,
//! !addquote, !undo, !herlaad
//!
//! Everything that reads or changes the quote database.

use async_trait::async_trait;
use tracing::{info, warn};

use super::{Context, Groups, Handler};
use crate::error::HandlerResult;
use crate::quotes::Quote;

const NAME_MISS: &str = "Die collega herinner ik me niet.";
const TEXT_MISS: &str = "Ik ken niemand die zoiets onfatsoenlijks zou zeggen.";
const CONFUSED: &str = "Daar snap ik helemaal niets van.";
const ADD_USAGE: &str = "!addquote Naam[, activiteit]: Blaat";

/// Which fields of a quote a query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter {
    /// Any quote.
    Any,
    /// Name contains group 1.
    Name,
    /// Text contains group 1.
    Text,
    /// Name contains group 1 and text contains group 2.
    NameAndText,
}

impl QueryFilter {
    fn matches(self, quote: &Quote, groups: &Groups) -> bool {
        match self {
            Self::Any => true,
            Self::Name => quote.name_contains(groups.get(1).trim()),
            Self::Text => quote.text_contains(groups.get(1).trim()),
            Self::NameAndText => {
                quote.name_contains(groups.get(1).trim())
                    && quote.text_contains(groups.get(2).trim())
            }
        }
    }

    fn render(self, quote: &Quote) -> String {
        match self {
            Self::Any | Self::Name => {
                format!("Mijn collega {} zou zeggen: \"{}\"", quote.name, quote.text)
            }
            Self::Text | Self::NameAndText => format!(
                "Mijn collega {} zou inderdaad zeggen: \"{}\"",
                quote.name, quote.text
            ),
        }
    }

    fn miss(self) -> &'static str {
        match self {
            Self::Any | Self::Name => NAME_MISS,
            Self::Text | Self::NameAndText => TEXT_MISS,
        }
    }
}

/// Handler for the random quote queries.
///
/// `!collega`, `!collega <name>`, `!wiezei <text>`, `!watzei <name> over <text>`
///
/// Picks a uniformly random quote among the matches. Substring matching is
/// case-insensitive.
pub struct QuoteQueryHandler {
    filter: QueryFilter,
}

impl QuoteQueryHandler {
    pub fn new(filter: QueryFilter) -> Self {
        Self { filter }
    }
}

#[async_trait]
impl Handler for QuoteQueryHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        let filter = self.filter;
        let state = &mut *ctx.state;
        let line = state
            .quotes
            .random_matching(&mut state.rng, |q| filter.matches(q, groups))
            .map(|q| filter.render(q));

        ctx.reply(line.unwrap_or_else(|| filter.miss().to_string()))
            .await
    }
}

/// Handler for `!college`.
pub struct CollegeHandler;

#[async_trait]
impl Handler for CollegeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        ctx.reply("Ik geef helaas geen colleges meer, ik ben met pensioen!")
            .await
    }
}

/// Handler for `!collage`: a random quote with name and text swapped.
pub struct CollageHandler;

#[async_trait]
impl Handler for CollageHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let state = &mut *ctx.state;
        let line = state
            .quotes
            .random_matching(&mut state.rng, |_| true)
            .map(|q| format!("Mijn collega {} zou zeggen: \"{}\"", q.text, q.name));

        ctx.reply(line.unwrap_or_else(|| NAME_MISS.to_string()))
            .await
    }
}

/// Handler for `!janeppo`: the bot quoting itself.
pub struct SelfQuoteHandler;

#[async_trait]
impl Handler for SelfQuoteHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let state = &mut *ctx.state;
        let line = state
            .quotes
            .random_matching(&mut state.rng, |q| q.name_contains("ikzelf"))
            .map(|q| QueryFilter::Name.render(q));

        ctx.reply(line.unwrap_or_else(|| NAME_MISS.to_string()))
            .await
    }
}

/// Handler for `!addquote`.
///
/// `!addquote <name>[, <role>]: <text>`
///
/// Malformed submissions get a puzzled reply in the channel and the usage
/// privately. Accepted quotes are written to the quote file straight away; a
/// failed write is logged and the quote stays in memory.
pub struct AddQuoteHandler;

#[async_trait]
impl Handler for AddQuoteHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        let added = ctx.state.quotes.append(groups.get(1)).map(Quote::clone);

        match added {
            Ok(quote) => {
                info!(
                    sender = %ctx.msg.sender,
                    name = %quote.name,
                    count = ctx.state.quotes.len(),
                    "Quote added"
                );
                if let Err(e) = ctx.state.quotes.persist() {
                    warn!(error = %e, path = %ctx.state.quotes.path().display(), "Failed to save quotes");
                }
                ctx.reply(format!(
                    "Als ik je goed begrijp, zou {} het volgende zeggen: \"{}\".",
                    quote.name, quote.text
                ))
                .await
            }
            Err(rejection) => {
                info!(sender = %ctx.msg.sender, reason = %rejection, "Quote rejected");
                ctx.reply(CONFUSED).await?;
                ctx.whisper(ADD_USAGE).await
            }
        }
    }
}

/// Handler for `!undo`.
///
/// Removes the last quote added since startup and whispers the `!addquote`
/// line that would bring it back.
pub struct UndoHandler;

#[async_trait]
impl Handler for UndoHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let Ok(quote) = ctx.state.quotes.undo_last() else {
            return ctx
                .reply("Je hebt nog helemaal niks gedaan, luiwammes.")
                .await;
        };

        info!(
            sender = %ctx.msg.sender,
            name = %quote.name,
            count = ctx.state.quotes.len(),
            "Quote removed"
        );
        if let Err(e) = ctx.state.quotes.persist() {
            warn!(error = %e, path = %ctx.state.quotes.path().display(), "Failed to save quotes");
        }

        ctx.reply("Ik ken een collega die nog wel een tip voor je heeft.")
            .await?;
        ctx.whisper(format!("!addquote {}: {}", quote.name, quote.text))
            .await
    }
}

/// Handler for `!herlaad`: re-read the quote file.
pub struct ReloadHandler;

#[async_trait]
impl Handler for ReloadHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        match ctx.state.quotes.reload() {
            Ok(count) => {
                info!(count, "Quotes reloaded");
                ctx.reply(format!("Ik bevat nu {count} wijsheden van collega's."))
                    .await
            }
            Err(e) => {
                warn!(error = %e, path = %ctx.state.quotes.path().display(), "Failed to reload quotes");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::core::testing::{CHANNEL, TestBed, replies};
    use crate::quotes::QuoteStore;

    fn only_reply(bed: &mut TestBed) -> String {
        let ops = bed.sent();
        let replies = replies(&ops);
        assert_eq!(replies.len(), 1, "expected one reply, got {ops:?}");
        assert_eq!(replies[0].0, CHANNEL);
        replies[0].1.to_string()
    }

    #[tokio::test]
    async fn collega_quotes_someone() {
        let mut bed = TestBed::new();
        bed.say("alice", "!collega").await.unwrap();
        let reply = only_reply(&mut bed);
        assert!(reply.starts_with("Mijn collega "), "{reply}");
        assert!(
            ["Erik", "Harm", "Mark"]
                .iter()
                .any(|name| reply.starts_with(&format!("Mijn collega {name} zou zeggen: \"")))
        );
    }

    #[tokio::test]
    async fn seeded_selection_is_reproducible() {
        let mut first = TestBed::new();
        let mut second = TestBed::new();
        for _ in 0..5 {
            first.say("alice", "!collega").await.unwrap();
            second.say("alice", "!collega").await.unwrap();
            assert_eq!(only_reply(&mut first), only_reply(&mut second));
        }
    }

    #[tokio::test]
    async fn name_and_text_filters() {
        let mut bed = TestBed::new();

        bed.say("alice", "!collega harm").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Mijn collega Harm zou zeggen: \"Let's be honest - almost right is the same as completely wrong.\""
        );

        bed.say("alice", "!wiezei LATEX").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Mijn collega Mark zou inderdaad zeggen: \"There's a new LaTeX-reader this year!\""
        );

        bed.say("alice", "!watzei ar over honest").await.unwrap();
        assert!(only_reply(&mut bed).starts_with("Mijn collega Harm zou inderdaad zeggen"));
    }

    #[tokio::test]
    async fn misses_use_their_own_wording() {
        let mut bed = TestBed::new();

        bed.say("alice", "!collega Ineke").await.unwrap();
        assert_eq!(only_reply(&mut bed), "Die collega herinner ik me niet.");

        bed.say("alice", "!wiezei koffie").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Ik ken niemand die zoiets onfatsoenlijks zou zeggen."
        );

        bed.say("alice", "!watzei Erik over honest").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Ik ken niemand die zoiets onfatsoenlijks zou zeggen."
        );
    }

    #[tokio::test]
    async fn collage_swaps_fields() {
        let mut bed = TestBed::new();
        bed.state.quotes = QuoteStore::from_quotes(
            vec![crate::quotes::Quote::new("Erik", "Koffie?")],
            bed.quote_path(),
        );
        bed.say("alice", "!collage").await.unwrap();
        assert_eq!(only_reply(&mut bed), "Mijn collega Koffie? zou zeggen: \"Erik\"");

        bed.say("alice", "!college").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Ik geef helaas geen colleges meer, ik ben met pensioen!"
        );
    }

    #[tokio::test]
    async fn janeppo_quotes_itself() {
        let mut bed = TestBed::new();
        bed.say("alice", "!janeppo").await.unwrap();
        assert_eq!(only_reply(&mut bed), "Die collega herinner ik me niet.");

        bed.say("alice", "!addquote ikzelf: Welnu.").await.unwrap();
        bed.sent();
        bed.say("alice", "!janeppo").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Mijn collega ikzelf zou zeggen: \"Welnu.\""
        );
    }

    #[tokio::test]
    async fn addquote_persists() {
        let mut bed = TestBed::new();
        bed.say("alice", "!addquote  Henk, koffiejuffrouw :  Suiker?  ")
            .await
            .unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Als ik je goed begrijp, zou Henk, koffiejuffrouw het volgende zeggen: \"Suiker?\"."
        );

        let reloaded = QuoteStore::load(bed.quote_path()).unwrap();
        assert_eq!(reloaded.len(), 4);
        assert_eq!(reloaded.quotes()[3].name, "Henk, koffiejuffrouw");
        assert_eq!(reloaded.quotes()[3].text, "Suiker?");
    }

    #[tokio::test]
    async fn addquote_rejection_whispers_usage() {
        let mut bed = TestBed::new();
        for bad in [
            "!addquote geen scheiding",
            "!addquote Erik, foo, bar, baz: text",
            "!addquote Erik: zei \"hoi\"",
            "!addquote Erik: ",
        ] {
            bed.say("alice", bad).await.unwrap();
            let ops = bed.sent();
            assert_eq!(
                replies(&ops),
                vec![
                    (CHANNEL, "Daar snap ik helemaal niets van."),
                    ("alice", "!addquote Naam[, activiteit]: Blaat"),
                ],
                "for {bad:?}"
            );
        }
        assert_eq!(bed.state.quotes.len(), 3);
    }

    #[tokio::test]
    async fn undo_only_reaches_back_to_startup() {
        let mut bed = TestBed::new();

        bed.say("alice", "!undo").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Je hebt nog helemaal niks gedaan, luiwammes."
        );

        bed.say("alice", "!addquote Erik: Dit is een test").await.unwrap();
        bed.sent();
        bed.say("bob", "!undo").await.unwrap();
        let ops = bed.sent();
        assert_eq!(
            replies(&ops),
            vec![
                (CHANNEL, "Ik ken een collega die nog wel een tip voor je heeft."),
                ("bob", "!addquote Erik: Dit is een test"),
            ]
        );
        assert_eq!(QuoteStore::load(bed.quote_path()).unwrap().len(), 3);

        bed.say("bob", "!undo").await.unwrap();
        assert_eq!(
            only_reply(&mut bed),
            "Je hebt nog helemaal niks gedaan, luiwammes."
        );
    }

    #[tokio::test]
    async fn undo_hint_round_trips() {
        let mut bed = TestBed::new();
        bed.say("alice", "!addquote Erik, docent: Dit is een test").await.unwrap();
        bed.sent();
        bed.say("alice", "!undo").await.unwrap();
        let ops = bed.sent();
        let hint = replies(&ops)[1].1.to_string();

        bed.say("alice", &hint).await.unwrap();
        let last = bed.state.quotes.quotes().last().unwrap();
        assert_eq!(last.name, "Erik, docent");
        assert_eq!(last.text, "Dit is een test");
    }

    #[tokio::test]
    async fn herlaad_reads_the_file() {
        let mut bed = TestBed::new();
        std::fs::write(
            bed.quote_path(),
            r#"[{"Name": "Ineke", "Text": "Hallo"}]"#,
        )
        .unwrap();

        bed.say("alice", "!herlaad").await.unwrap();
        assert_eq!(only_reply(&mut bed), "Ik bevat nu 1 wijsheden van collega's.");
        assert_eq!(bed.state.quotes.len(), 1);
    }

    #[tokio::test]
    async fn herlaad_failure_keeps_quotes() {
        let mut bed = TestBed::new();
        std::fs::write(bed.quote_path(), "kapot").unwrap();

        bed.say("alice", "!herlaad").await.unwrap();
        assert!(bed.sent().is_empty());
        assert_eq!(bed.state.quotes.len(), 3);
    }
}
