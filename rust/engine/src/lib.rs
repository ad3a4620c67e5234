//! # scopa-engine: Scopa Rules Engine
//!
//! The authoritative rules for two-player Scopa on a 40-card Italian deck.
//! Every operation is a pure function from one immutable [`game::RoundState`]
//! to the next; the only randomness is the seeded shuffle at round start.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card, suit and id types
//! - [`deck`] - Deck definitions, explicit registry and seeded shuffling
//! - [`rules`] - Capture enumeration and validation
//! - [`game`] - Round state, configuration and public views
//! - [`engine`] - Round operations: start, play, deal, round-over check
//! - [`scoring`] - End-of-round scoring
//! - [`player`] - Per-player state, ids and moves
//! - [`logger`] - RoundRecord serialization for round history
//! - [`errors`] - Error types for round and deck operations
//!
//! ## Quick Start
//!
//! ```rust
//! use scopa_engine::deck::{load_deck, DeckRegistry, NAPOLITANE};
//! use scopa_engine::engine::{deal_if_needed, is_round_over, play_move, score_round, start_round};
//! use scopa_engine::game::{Phase, RoundConfig};
//! use scopa_engine::player::PlayerId;
//!
//! let registry = DeckRegistry::with_builtin();
//! let deck = load_deck(&registry, NAPOLITANE).unwrap();
//! let seats: [PlayerId; 2] = ["north".into(), "south".into()];
//!
//! let mut state = start_round(&deck, &seats, RoundConfig::default(), 2024).unwrap();
//! while !is_round_over(&state) {
//!     let actor = state.current_player().id().clone();
//!     // take the first listed option for the first card in hand
//!     let mv = state.legal_moves(&actor).remove(0);
//!     state = play_move(&state, &actor, &mv.card_id, &mv.capture_ids).unwrap();
//!     state = deal_if_needed(&state);
//! }
//! let scored = score_round(&state).unwrap();
//! assert_eq!(scored.phase(), Phase::Finished);
//! assert!(scored.table().is_empty());
//! ```
//!
//! ## Capture Priority
//!
//! A card on the table matching the played rank must be taken on its own:
//!
//! ```rust
//! use scopa_engine::cards::{Card, Suit};
//! use scopa_engine::rules::enumerate_captures;
//!
//! let table = [
//!     Card::new(Suit::Coppe, 1, "c1").unwrap(),
//!     Card::new(Suit::Coppe, 2, "c2").unwrap(),
//!     Card::new(Suit::Spade, 3, "s3").unwrap(),
//! ];
//! let options = enumerate_captures(3, &table);
//! assert_eq!(options, vec![vec![table[2].clone()]]);
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod logger;
pub mod player;
pub mod rules;
pub mod scoring;
