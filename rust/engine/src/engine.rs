//! Stateless round operations.
//!
//! Each function takes a [`RoundState`] by reference and returns the next
//! state. Nothing is kept between calls; the caller threads the returned
//! state into the next call. A failed call leaves the caller's state as it
//! was.

use im::Vector;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::cards::{Card, CardId};
use crate::deck::{shuffled, DECK_SIZE};
use crate::errors::{GameError, StateViolation};
use crate::game::{Phase, RoundConfig, RoundState, PLAYER_COUNT};
use crate::player::{PlayerId, PlayerState};
use crate::rules::validate_capture;

pub use crate::scoring::score_round;

/// Shuffles `deck` with `seed` and deals the opening table and hands.
///
/// The table receives `config.initial_table_size` cards, then each player
/// receives `config.hand_size` cards one at a time in seat order.
///
/// # Errors
///
/// [`GameError::InvalidState`] unless exactly two distinct players and 40
/// distinct cards are supplied and `config` is dealable.
///
/// # Examples
///
/// ```
/// use scopa_engine::deck::{load_deck, DeckRegistry, NAPOLITANE};
/// use scopa_engine::engine::start_round;
/// use scopa_engine::game::{Phase, RoundConfig};
/// use scopa_engine::player::PlayerId;
///
/// let deck = load_deck(&DeckRegistry::with_builtin(), NAPOLITANE).unwrap();
/// let players: [PlayerId; 2] = ["ann".into(), "bob".into()];
/// let a = start_round(&deck, &players, RoundConfig::default(), 42).unwrap();
/// let b = start_round(&deck, &players, RoundConfig::default(), 42).unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(a.phase(), Phase::Playing);
/// assert_eq!(a.table().len(), 4);
/// assert_eq!(a.deck().len(), 30);
/// ```
pub fn start_round(
    deck: &[Card],
    player_ids: &[PlayerId],
    config: RoundConfig,
    shuffle_seed: u64,
) -> Result<RoundState, GameError> {
    if player_ids.len() != PLAYER_COUNT {
        return Err(StateViolation::PlayerCount(player_ids.len()).into());
    }
    if player_ids[0] == player_ids[1] {
        return Err(StateViolation::DuplicatePlayer(player_ids[0].clone()).into());
    }
    if deck.len() != DECK_SIZE {
        return Err(StateViolation::DeckSize {
            expected: DECK_SIZE,
            got: deck.len(),
        }
        .into());
    }
    let mut seen = HashSet::with_capacity(DECK_SIZE);
    for card in deck {
        if !seen.insert(card.id()) {
            return Err(StateViolation::DuplicateCard(card.id().clone()).into());
        }
    }
    config.validate()?;

    let mut state = RoundState {
        deck: shuffled(deck, shuffle_seed).into_iter().collect(),
        table: Vector::new(),
        players: player_ids.iter().cloned().map(PlayerState::new).collect(),
        current_player_index: 0,
        last_capture_player_id: None,
        scores: player_ids.iter().map(|id| (id.clone(), 0)).collect::<BTreeMap<_, _>>(),
        phase: Phase::Playing,
        config: Arc::new(config),
    };

    for _ in 0..state.config.initial_table_size {
        if let Some(card) = state.deck.pop_front() {
            state.table.push_back(card);
        }
    }
    deal_hands(&mut state);
    Ok(state)
}

/// Plays `card_id` from the acting player's hand, capturing `capture_ids`
/// from the table, or discarding the card when `capture_ids` is empty.
///
/// A capture that clears the table scores a scopa, except when the deck is
/// already empty. Turn passes to the next seat either way. The caller is
/// expected to run [`deal_if_needed`] afterwards.
///
/// # Errors
///
/// - [`GameError::InvalidState`] if the round is not in [`Phase::Playing`]
/// - [`GameError::WrongTurn`] if `acting` is not the current player
/// - [`GameError::CardNotInHand`] if the card is not in the acting hand
/// - [`GameError::InvalidCapture`] / [`GameError::EqualValuePriority`] from
///   [`validate_capture`]
pub fn play_move(
    state: &RoundState,
    acting: &PlayerId,
    card_id: &CardId,
    capture_ids: &[CardId],
) -> Result<RoundState, GameError> {
    if state.phase() != Phase::Playing {
        return Err(StateViolation::NotPlaying(state.phase()).into());
    }
    let expected = state.current_player();
    if expected.id() != acting {
        return Err(GameError::WrongTurn {
            acting: acting.clone(),
            expected: expected.id().clone(),
        });
    }
    let played = expected
        .holds(card_id)
        .ok_or_else(|| GameError::CardNotInHand {
            card_id: card_id.clone(),
            player_id: acting.clone(),
        })?;
    let captured = validate_capture(played.rank(), capture_ids, state.table())?;

    let mut next = state.clone();
    let seat = next.current_player_index;
    let Some(player) = next.players.get_mut(seat) else {
        return Err(StateViolation::UnknownPlayer(acting.clone()).into());
    };
    let Some(played) = player.take_from_hand(card_id) else {
        return Err(GameError::CardNotInHand {
            card_id: card_id.clone(),
            player_id: acting.clone(),
        });
    };

    if captured.is_empty() {
        next.table.push_back(played);
    } else {
        next.table = next
            .table
            .iter()
            .filter(|c| !captured.iter().any(|t| t.id() == c.id()))
            .cloned()
            .collect();
        let sweep = next.table.is_empty() && !next.deck.is_empty();
        player.bank(std::iter::once(played).chain(captured));
        if sweep {
            player.add_scopa();
        }
        next.last_capture_player_id = Some(acting.clone());
    }

    next.current_player_index = (seat + 1) % next.players.len();
    Ok(next)
}

/// Deals a fresh hand to every player when all hands are empty and the deck
/// still has cards. Otherwise returns an unchanged copy. The table is never
/// refilled mid-round.
pub fn deal_if_needed(state: &RoundState) -> RoundState {
    let mut next = state.clone();
    if !next.deck.is_empty() && next.players.iter().all(|p| p.hand().is_empty()) {
        deal_hands(&mut next);
    }
    next
}

/// True once the deck and every hand are empty.
pub fn is_round_over(state: &RoundState) -> bool {
    state.deck().is_empty() && state.players().iter().all(|p| p.hand().is_empty())
}

fn deal_hands(state: &mut RoundState) {
    for _ in 0..state.config.hand_size {
        for seat in 0..state.players.len() {
            let Some(card) = state.deck.pop_front() else {
                return;
            };
            if let Some(p) = state.players.get_mut(seat) {
                p.receive(card);
            }
        }
    }
}
