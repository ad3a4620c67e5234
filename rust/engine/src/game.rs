use im::Vector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::cards::{Card, Suit};
use crate::deck::DECK_SIZE;
use crate::errors::{GameError, StateViolation};
use crate::player::{Move, PlayerId, PlayerState};
use crate::rules::enumerate_captures;

/// Number of seats in a round.
pub const PLAYER_COUNT: usize = 2;

/// Rank to primiera points lookup. Ranks missing from the table score the
/// fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimieraTable {
    points: BTreeMap<u8, u32>,
    fallback: u32,
}

impl PrimieraTable {
    pub fn new(points: BTreeMap<u8, u32>, fallback: u32) -> Self {
        Self { points, fallback }
    }

    pub fn value(&self, rank: u8) -> u32 {
        self.points.get(&rank).copied().unwrap_or(self.fallback)
    }
}

impl Default for PrimieraTable {
    fn default() -> Self {
        let points = [(7, 21), (6, 18), (1, 16), (5, 15), (4, 14), (3, 13), (2, 12)]
            .into_iter()
            .collect();
        Self {
            points,
            fallback: 10,
        }
    }
}

/// Immutable per-round rule settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Cards dealt to each player per deal
    pub hand_size: usize,
    /// Cards laid face up when the round starts
    pub initial_table_size: usize,
    /// Suit counted for most coins and the settebello
    pub coins_suit: Suit,
    pub primiera: PrimieraTable,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            hand_size: 3,
            initial_table_size: 4,
            coins_suit: Suit::Oro,
            primiera: PrimieraTable::default(),
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), StateViolation> {
        if self.hand_size == 0 {
            return Err(StateViolation::BadConfig("hand_size must be at least 1".into()));
        }
        let opening = self.initial_table_size + PLAYER_COUNT * self.hand_size;
        if opening > DECK_SIZE {
            return Err(StateViolation::BadConfig(format!(
                "opening deal needs {opening} cards but the deck has {DECK_SIZE}"
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a round. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Playing,
    Scoring,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Playing => "playing",
            Phase::Scoring => "scoring",
            Phase::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// The snapshot threaded through every engine operation.
///
/// Operations never modify a `RoundState` in place; they clone it and return
/// the successor. Card collections are persistent vectors, so a clone costs
/// a handful of pointer copies regardless of how many cards have moved.
///
/// Every state upholds card conservation: deck, table, hands and captured
/// piles together hold each card of the original deck exactly once. The
/// one exception is a finished round in which nobody captured, whose
/// leftover table was dropped at scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoundParts", into = "RoundParts")]
pub struct RoundState {
    pub(crate) deck: Vector<Card>,
    pub(crate) table: Vector<Card>,
    pub(crate) players: Vector<PlayerState>,
    pub(crate) current_player_index: usize,
    pub(crate) last_capture_player_id: Option<PlayerId>,
    pub(crate) scores: BTreeMap<PlayerId, u32>,
    pub(crate) phase: Phase,
    pub(crate) config: Arc<RoundConfig>,
}

/// Plain, fully public form of a [`RoundState`]; this is also the serialized
/// layout of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundParts {
    pub deck: Vec<Card>,
    pub table: Vec<Card>,
    pub players: Vec<PlayerState>,
    pub current_player_index: usize,
    #[serde(default)]
    pub last_capture_player_id: Option<PlayerId>,
    #[serde(default)]
    pub scores: BTreeMap<PlayerId, u32>,
    pub phase: Phase,
    #[serde(default)]
    pub config: RoundConfig,
}

impl RoundState {
    /// Assembles a state from its parts after checking seat count, card
    /// conservation, references to players and, for a finished round, that
    /// deck, table and hands are empty. A state in [`Phase::Scoring`] is
    /// refused since scoring never stops there.
    pub fn from_parts(parts: RoundParts) -> Result<Self, GameError> {
        parts.config.validate()?;
        if parts.players.len() != PLAYER_COUNT {
            return Err(StateViolation::PlayerCount(parts.players.len()).into());
        }
        if parts.players[0].id() == parts.players[1].id() {
            return Err(StateViolation::DuplicatePlayer(parts.players[0].id().clone()).into());
        }
        if parts.current_player_index >= PLAYER_COUNT {
            return Err(StateViolation::BadConfig(format!(
                "current player index {} out of range",
                parts.current_player_index
            ))
            .into());
        }
        let is_seated = |id: &PlayerId| parts.players.iter().any(|p| p.id() == id);
        if let Some(id) = &parts.last_capture_player_id {
            if !is_seated(id) {
                return Err(StateViolation::UnknownPlayer(id.clone()).into());
            }
        }
        if let Some(id) = parts.scores.keys().find(|id| !is_seated(id)) {
            return Err(StateViolation::UnknownPlayer(id.clone()).into());
        }

        let finished = match parts.phase {
            Phase::Playing => false,
            Phase::Finished => true,
            Phase::Scoring => {
                return Err(StateViolation::Inconsistent("scoring phase is never persisted".into()).into())
            }
        };
        if finished {
            if !parts.deck.is_empty() || !parts.table.is_empty() {
                return Err(StateViolation::Inconsistent(
                    "finished round still has cards in deck or table".into(),
                )
                .into());
            }
            if parts.players.iter().any(|p| !p.hand().is_empty()) {
                return Err(StateViolation::Inconsistent("finished round still has cards in hand".into()).into());
            }
        }

        let all = parts
            .deck
            .iter()
            .chain(parts.table.iter())
            .chain(parts.players.iter().flat_map(|p| p.hand().iter().chain(p.captured().iter())));
        let mut seen = HashSet::new();
        for card in all {
            if !seen.insert(card.id().clone()) {
                return Err(StateViolation::DuplicateCard(card.id().clone()).into());
            }
        }
        // Scoring drops the leftover table only when nobody ever captured.
        let dropped_table = finished && parts.last_capture_player_id.is_none() && seen.len() < DECK_SIZE;
        if seen.len() != DECK_SIZE && !dropped_table {
            return Err(StateViolation::DeckSize {
                expected: DECK_SIZE,
                got: seen.len(),
            }
            .into());
        }

        let mut scores = parts.scores;
        for p in &parts.players {
            scores.entry(p.id().clone()).or_insert(0);
        }

        Ok(Self {
            deck: parts.deck.into_iter().collect(),
            table: parts.table.into_iter().collect(),
            players: parts.players.into_iter().collect(),
            current_player_index: parts.current_player_index,
            last_capture_player_id: parts.last_capture_player_id,
            scores,
            phase: parts.phase,
            config: Arc::new(parts.config),
        })
    }

    pub fn deck(&self) -> &Vector<Card> {
        &self.deck
    }

    pub fn table(&self) -> &Vector<Card> {
        &self.table
    }

    pub fn players(&self) -> &Vector<PlayerState> {
        &self.players
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn last_capture_player_id(&self) -> Option<&PlayerId> {
        self.last_capture_player_id.as_ref()
    }

    pub fn scores(&self) -> &BTreeMap<PlayerId, u32> {
        &self.scores
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn current_player(&self) -> &PlayerState {
        &self.players[self.current_player_index]
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn score_of(&self, id: &PlayerId) -> u32 {
        self.scores.get(id).copied().unwrap_or(0)
    }

    pub(crate) fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    /// Every card held anywhere in the round: deck, table, hands and piles.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.deck
            .iter()
            .chain(self.table.iter())
            .chain(self.players.iter().flat_map(|p| p.hand().iter().chain(p.captured().iter())))
    }

    /// Moves available to `player`: one per capture option of each hand card,
    /// and a discard for each hand card that cannot capture.
    ///
    /// [`crate::engine::play_move`] also accepts discarding a card that could
    /// capture; those moves are not listed here.
    pub fn legal_moves(&self, player: &PlayerId) -> Vec<Move> {
        let Some(p) = self.player(player) else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        for card in p.hand() {
            let options = enumerate_captures(card.rank(), &self.table);
            if options.is_empty() {
                moves.push(Move::discard(card.id().clone()));
            }
            for option in options {
                let ids = option.iter().map(|c| c.id().clone()).collect();
                moves.push(Move::capture(card.id().clone(), ids));
            }
        }
        moves
    }

    /// What `viewer` is allowed to see: their own hand, the table and
    /// per-seat counts. The opponent's hand and the deck order stay hidden.
    ///
    /// While the round is in play, scores shown are the sweeps made so far;
    /// once finished they are the final round scores.
    pub fn public_view(&self, viewer: &PlayerId) -> Result<PublicView, GameError> {
        let me = self
            .player(viewer)
            .ok_or_else(|| StateViolation::UnknownPlayer(viewer.clone()))?;
        let finished = self.phase == Phase::Finished;
        let scores = self
            .players
            .iter()
            .map(|p| {
                let base = self.score_of(p.id());
                let live = if finished { base } else { base + p.scopas() };
                (p.id().clone(), live)
            })
            .collect();
        let current = self.current_player().id().clone();
        Ok(PublicView {
            viewer: viewer.clone(),
            phase: self.phase,
            deck_remaining: self.deck.len(),
            table: self.table.iter().cloned().collect(),
            hand: me.hand().iter().cloned().collect(),
            is_viewer_turn: &current == viewer,
            current_player_id: current,
            last_capture_player_id: self.last_capture_player_id.clone(),
            scores,
            seats: self
                .players
                .iter()
                .map(|p| SeatSummary {
                    id: p.id().clone(),
                    hand_count: p.hand().len(),
                    captured_count: p.captured().len(),
                    scopas: p.scopas(),
                })
                .collect(),
        })
    }
}

impl TryFrom<RoundParts> for RoundState {
    type Error = GameError;

    fn try_from(parts: RoundParts) -> Result<Self, Self::Error> {
        RoundState::from_parts(parts)
    }
}

impl From<RoundState> for RoundParts {
    fn from(state: RoundState) -> Self {
        RoundParts {
            deck: state.deck.into_iter().collect(),
            table: state.table.into_iter().collect(),
            players: state.players.into_iter().collect(),
            current_player_index: state.current_player_index,
            last_capture_player_id: state.last_capture_player_id,
            scores: state.scores,
            phase: state.phase,
            config: (*state.config).clone(),
        }
    }
}

/// A UI-safe projection of a [`RoundState`] for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicView {
    pub viewer: PlayerId,
    pub phase: Phase,
    pub deck_remaining: usize,
    pub table: Vec<Card>,
    pub hand: Vec<Card>,
    pub current_player_id: PlayerId,
    pub is_viewer_turn: bool,
    pub last_capture_player_id: Option<PlayerId>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub seats: Vec<SeatSummary>,
}

/// Public counters for one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub id: PlayerId,
    pub hand_count: usize,
    pub captured_count: usize,
    pub scopas: u32,
}
