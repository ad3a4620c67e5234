//! Uniform random policy, used as a sparring partner in simulations.

use rand::RngCore;
use rand::seq::IndexedRandom;
use scopa_engine::game::RoundState;
use scopa_engine::player::{Move, PlayerId};

use crate::{AIOpponent, AiError};

/// Picks uniformly among [`RoundState::legal_moves`].
#[derive(Debug, Clone, Default)]
pub struct RandomAI;

impl RandomAI {
    pub fn new() -> Self {
        Self
    }
}

impl AIOpponent for RandomAI {
    fn choose_move(&self, state: &RoundState, player: &PlayerId, rng: &mut dyn RngCore) -> Result<Move, AiError> {
        state
            .legal_moves(player)
            .choose(rng)
            .cloned()
            .ok_or_else(|| AiError::NoMove(player.clone()))
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}
