use rand::SeedableRng;
use rand::rngs::StdRng;

use super::butterfly::ButterflyBook;
use crate::quotes::QuoteStore;

/// State owned by the protocol loop and lent to handlers.
///
/// Survives reconnects; only the session nickname is reset per connection.
pub struct BotState {
    pub quotes: QuoteStore,
    pub rng: StdRng,
    pub butterflies: ButterflyBook,
}

impl BotState {
    /// Seeded state gives reproducible replies.
    pub fn new(quotes: QuoteStore, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            quotes,
            rng,
            butterflies: ButterflyBook::default(),
        }
    }
}
