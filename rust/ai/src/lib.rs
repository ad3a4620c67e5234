//! # scopa-ai: Move Selection for Scopa
//!
//! AI opponents for the Scopa engine, behind a common [`AIOpponent`] trait.
//! Strategies only ever read the round state; the engine stays the sole
//! judge of legality and every move returned here is one it accepts.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for move selection
//! - [`greedy`] - One-ply greedy strategy used for real play
//! - [`random`] - Uniform random policy for simulations
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use scopa_ai::create_ai;
//! use scopa_engine::deck::{load_deck, DeckRegistry, NAPOLITANE};
//! use scopa_engine::engine::{play_move, start_round};
//! use scopa_engine::game::RoundConfig;
//! use scopa_engine::player::PlayerId;
//!
//! let deck = load_deck(&DeckRegistry::with_builtin(), NAPOLITANE).unwrap();
//! let seats: [PlayerId; 2] = ["cpu".into(), "you".into()];
//! let state = start_round(&deck, &seats, RoundConfig::default(), 42).unwrap();
//!
//! let ai = create_ai("greedy").unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mv = ai.choose_move(&state, &seats[0], &mut rng).unwrap();
//! assert!(play_move(&state, &seats[0], &mv.card_id, &mv.capture_ids).is_ok());
//! ```
//!
//! ## AI Types
//!
//! - `"greedy"` - Prefers sweeps, then big captures, coins and the settebello
//! - `"random"` - Picks any listed move uniformly

use rand::RngCore;
use scopa_engine::game::RoundState;
use scopa_engine::player::{Move, PlayerId};
use thiserror::Error;

pub mod greedy;
pub mod random;

/// Names accepted by [`create_ai`].
pub const AI_NAMES: [&str; 2] = ["greedy", "random"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("Unknown AI type: {0} (expected one of: greedy, random)")]
    Unknown(String),
    #[error("Player {0} has no card to play")]
    NoMove(PlayerId),
}

/// Trait defining the interface for AI opponents.
///
/// # Example Implementation
///
/// ```rust
/// use rand::RngCore;
/// use scopa_ai::{AIOpponent, AiError};
/// use scopa_engine::game::RoundState;
/// use scopa_engine::player::{Move, PlayerId};
///
/// struct FirstCard;
///
/// impl AIOpponent for FirstCard {
///     fn choose_move(
///         &self,
///         state: &RoundState,
///         player: &PlayerId,
///         _rng: &mut dyn RngCore,
///     ) -> Result<Move, AiError> {
///         state
///             .legal_moves(player)
///             .into_iter()
///             .next()
///             .ok_or_else(|| AiError::NoMove(player.clone()))
///     }
///
///     fn name(&self) -> &str {
///         "FirstCard"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// Chooses the next move for `player`.
    ///
    /// All randomness must come from `rng`, so a seeded generator makes the
    /// choice reproducible.
    ///
    /// # Errors
    ///
    /// [`AiError::NoMove`] when `player` is not seated or holds no cards.
    fn choose_move(&self, state: &RoundState, player: &PlayerId, rng: &mut dyn RngCore) -> Result<Move, AiError>;

    fn name(&self) -> &str;
}

/// Creates an AI opponent by type name.
///
/// # Example
///
/// ```rust
/// use scopa_ai::create_ai;
///
/// let ai = create_ai("greedy").unwrap();
/// assert_eq!(ai.name(), "GreedyAI");
/// assert!(create_ai("minimax").is_err());
/// ```
pub fn create_ai(ai_type: &str) -> Result<Box<dyn AIOpponent>, AiError> {
    match ai_type {
        "greedy" => Ok(Box::new(greedy::GreedyAI::new())),
        "random" => Ok(Box::new(random::RandomAI::new())),
        other => Err(AiError::Unknown(other.to_string())),
    }
}
