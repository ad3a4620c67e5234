//! One-ply greedy strategy.
//!
//! Enumerates every capture available to the hand and ranks them, highest
//! first, by:
//!
//! 1. clears the table (a sweep)
//! 2. number of table cards taken
//! 3. takes the settebello
//! 4. takes any coin
//! 5. rank of the played card (keeps low cards for later sums)
//!
//! Ties are broken with the caller's RNG. With no capture available it
//! discards the lowest card outside the coins suit, falling back to the
//! lowest coin when the hand is all coins.

use rand::RngCore;
use rand::seq::IndexedRandom;
use scopa_engine::cards::{Card, SETTEBELLO_RANK, Suit};
use scopa_engine::game::RoundState;
use scopa_engine::player::{Move, PlayerId};
use scopa_engine::rules::enumerate_captures;

use crate::{AIOpponent, AiError};

#[derive(Debug, Clone, Default)]
pub struct GreedyAI;

impl GreedyAI {
    pub fn new() -> Self {
        Self
    }
}

/// Comparable priority of a capture; larger is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Priority {
    sweeps: bool,
    taken: usize,
    settebello: bool,
    coin: bool,
    played_rank: u8,
}

fn priority(played: &Card, taken: &[Card], table_len: usize, coins: Suit) -> Priority {
    let gained = || taken.iter().chain(std::iter::once(played));
    Priority {
        sweeps: taken.len() == table_len,
        taken: taken.len(),
        settebello: gained().any(|c| c.suit() == coins && c.rank() == SETTEBELLO_RANK),
        coin: taken.iter().any(|c| c.suit() == coins),
        played_rank: played.rank(),
    }
}

impl AIOpponent for GreedyAI {
    fn choose_move(&self, state: &RoundState, player: &PlayerId, rng: &mut dyn RngCore) -> Result<Move, AiError> {
        let hand = state
            .player(player)
            .map(|p| p.hand())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AiError::NoMove(player.clone()))?;
        let coins = state.config().coins_suit;
        let table_len = state.table().len();

        let mut scored: Vec<(Priority, &Card, Vec<Card>)> = Vec::new();
        for card in hand {
            for option in enumerate_captures(card.rank(), state.table()) {
                scored.push((priority(card, &option, table_len, coins), card, option));
            }
        }

        if let Some(best) = scored.iter().map(|(p, _, _)| *p).max() {
            let candidates: Vec<&(Priority, &Card, Vec<Card>)> = scored.iter().filter(|(p, _, _)| *p == best).collect();
            let (_, card, option) = candidates
                .choose(rng)
                .copied()
                .ok_or_else(|| AiError::NoMove(player.clone()))?;
            let ids = option.iter().map(|c| c.id().clone()).collect();
            return Ok(Move::capture(card.id().clone(), ids));
        }

        let plain: Vec<&Card> = hand.iter().filter(|c| c.suit() != coins).collect();
        let pool: Vec<&Card> = if plain.is_empty() { hand.iter().collect() } else { plain };
        let lowest = pool.iter().map(|c| c.rank()).min().unwrap_or_default();
        let lows: Vec<&Card> = pool.into_iter().filter(|c| c.rank() == lowest).collect();
        let discard = lows.choose(rng).ok_or_else(|| AiError::NoMove(player.clone()))?;
        Ok(Move::discard(discard.id().clone()))
    }

    fn name(&self) -> &str {
        "GreedyAI"
    }
}
