use thiserror::Error;

use crate::cards::CardId;
use crate::game::Phase;
use crate::player::PlayerId;

/// Failures of the round operations.
///
/// Every variant describes invalid caller input or a broken precondition.
/// An operation that returns one of these leaves the caller's state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not player {acting}'s turn (expected player {expected})")]
    WrongTurn { acting: PlayerId, expected: PlayerId },
    #[error("Card {card_id} is not in player {player_id}'s hand")]
    CardNotInHand { card_id: CardId, player_id: PlayerId },
    #[error("Invalid capture for rank {rank}: {reason}")]
    InvalidCapture {
        rank: u8,
        capture_ids: Vec<CardId>,
        reason: CaptureFault,
    },
    #[error("Card {matching_id} matches rank {rank} and must be taken instead of a sum")]
    EqualValuePriority { rank: u8, matching_id: CardId },
    #[error("Invalid state: {0}")]
    InvalidState(#[from] StateViolation),
}

/// Why a proposed capture set was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureFault {
    #[error("not on the table: {}", join_ids(.missing))]
    NotOnTable { missing: Vec<CardId> },
    #[error("card {id} proposed more than once")]
    DuplicateId { id: CardId },
    #[error("captured ranks sum to {actual}, played rank is {expected}")]
    WrongSum { expected: u32, actual: u32 },
}

/// Broken preconditions: malformed round arguments or an operation invoked
/// in the wrong phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateViolation {
    #[error("a round needs exactly 2 players, got {0}")]
    PlayerCount(usize),
    #[error("a round needs exactly {expected} cards, got {got}")]
    DeckSize { expected: usize, got: usize },
    #[error("card {0} appears more than once")]
    DuplicateCard(CardId),
    #[error("player id {0} appears more than once")]
    DuplicatePlayer(PlayerId),
    #[error("invalid round config: {0}")]
    BadConfig(String),
    #[error("round is not over yet")]
    RoundNotOver,
    #[error("round has already been scored")]
    AlreadyScored,
    #[error("moves are not accepted in the {0} phase")]
    NotPlaying(Phase),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("no round in progress")]
    NoActiveRound,
    #[error("inconsistent round snapshot: {0}")]
    Inconsistent(String),
}

/// Deck definition and registry failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck '{name}' is not registered (available: {})", .available.join(", "))]
    NotFound { name: String, available: Vec<String> },
    #[error("invalid deck definition '{name}': {}", .problems.join("; "))]
    InvalidDefinition { name: String, problems: Vec<String> },
    #[error("deck '{name}' must contain {expected} cards, got {got}")]
    Incomplete {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid card: {reason}")]
    InvalidCard { reason: String },
}

fn join_ids(ids: &[CardId]) -> String {
    ids.iter()
        .map(CardId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
