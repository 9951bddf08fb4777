//! Easter eggs: !pikk, !ijbepikk, gang, lazer, !sl, !butterfly and the
//! stock replies for anything else addressed to the bot.

use async_trait::async_trait;
use eppo_proto::Operation;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use super::{Context, Groups, Handler};
use crate::error::HandlerResult;

/// Added to the draw for senders who asked for it.
const BONUS: f32 = 0.3;

/// Handler for the measurement commands.
///
/// `!pikk` and `!ijbepikk` draw a fraction in `[0, 1)` and render it; a few
/// regulars get a head start.
pub struct MeasureHandler {
    favoured: &'static [&'static str],
    render: fn(f32) -> String,
}

impl MeasureHandler {
    /// `!pikk`
    pub fn attachment() -> Self {
        Self {
            favoured: &["piet", "Eggie"],
            render: render_attachment,
        }
    }

    /// `!ijbepikk`
    pub fn frustration() -> Self {
        Self {
            favoured: &["ijbema"],
            render: render_frustration,
        }
    }

    fn measure(&self, sender: &str, draw: f32) -> String {
        let size = if self.favoured.contains(&sender) {
            draw + BONUS
        } else {
            draw
        };
        (self.render)(size)
    }
}

fn decoration_len(size: f32) -> usize {
    1 + (size * 10.0) as usize
}

fn render_attachment(size: f32) -> String {
    format!(
        "{:3.14} cm 8{})",
        size * 50.0,
        "=".repeat(decoration_len(size))
    )
}

fn render_frustration(size: f32) -> String {
    format!(
        "{:3.14} cm -_-{}",
        size * 50.0,
        ";".repeat(decoration_len(size))
    )
}

#[async_trait]
impl Handler for MeasureHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let draw = ctx.state.rng.gen_range(0.0f32..1.0);
        let line = self.measure(&ctx.msg.sender, draw);
        ctx.reply(line).await
    }
}

/// Handler that always answers with the same line.
pub struct CannedHandler {
    text: &'static str,
}

impl CannedHandler {
    pub fn new(text: &'static str) -> Self {
        Self { text }
    }
}

#[async_trait]
impl Handler for CannedHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        ctx.reply(self.text).await
    }
}

const TRAIN: [&str; 3] = [
    " _||__|  |  ______   ______ ",
    "(        | |      | |      |",
    "/-()---() ~ ()--() ~ ()--() ",
];

/// Handler for `!sl`: a small steam train.
pub struct TrainHandler;

#[async_trait]
impl Handler for TrainHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        for line in TRAIN {
            ctx.reply(line).await?;
        }
        Ok(())
    }
}

/// Handler for `!butterfly`.
///
/// A coin flip decides between kicking the sender and toggling their
/// operator status. Either lands after the configured delay. The toggle
/// direction is only known once the `NAMES` reply is in, so the protocol
/// loop finishes that half.
pub struct ButterflyHandler;

#[async_trait]
impl Handler for ButterflyHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        if ctx.msg.is_private() {
            return ctx.reply("Dat werkt alleen in een kanaal").await;
        }

        let channel = &ctx.msg.channel;
        let sender = &ctx.msg.sender;
        let delay = ctx.config.butterfly_delay();

        if ctx.state.rng.gen_bool(0.5) {
            info!(nick = %sender, channel = %channel, delay_secs = delay.as_secs(), "Scheduling butterfly kick");
            ctx.scheduler.schedule(
                delay,
                Operation::raw(
                    "KICK",
                    format!("{channel} {sender} :Je vlinder heeft helaas een orkaan veroorzaakt"),
                ),
            );
            Ok(())
        } else {
            info!(nick = %sender, channel = %channel, delay_secs = delay.as_secs(), "Scheduling butterfly op toggle");
            ctx.state.butterflies.request(channel, sender);
            ctx.send(Operation::raw("NAMES", channel.as_str())).await
        }
    }
}

const BANTER: [&str; 20] = [
    "Probeer het eens met euclidische meetkunde.",
    "Weet ik veel...",
    "Vraag het een ander, ik ben met pensioen",
    "Ik zal het even aan Harm vragen.",
    "Wat zei je? Ik zat even aan Ineke te denken.",
    "Daar staat wat tegenover...",
    "Leer eerst eens spellen.",
    "Denk je echt dat ik je help na alles wat je over me gezegd hebt?",
    "Dit is meer iets voor mijn collega Moddemeyer",
    "Kun je dat verklaren?",
    "Dat is niet bevredigend.",
    "Daar kun je nog geen conclusie uit trekken.",
    "Misschien dat Jan Salvador daar meer van weet.",
    "Begrijp je de vraag eigenlijk wel?",
    "Misschien moet je het eens van de andere kant bekijken.",
    "Dat kan efficienter.",
    "Daar zie ik geen Eulerpad in.",
    "Ik denk dat ik het begrijp, maar wat doet het?",
    "Daar kun je beter een graaf bij tekenen.",
    "Ik denk dat het iets met priemgetallen te maken heeft.",
];

/// Handler for anything else addressed to the bot by name.
pub struct BanterHandler;

#[async_trait]
impl Handler for BanterHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let line = BANTER.choose(&mut ctx.state.rng).copied().unwrap_or(BANTER[0]);
        ctx.reply(line).await
    }
}
