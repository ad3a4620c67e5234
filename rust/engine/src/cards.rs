use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::errors::DeckError;

/// Lowest rank of an Italian deck (the ace, "asso").
pub const MIN_RANK: u8 = 1;
/// Highest rank of an Italian deck (the king, "re").
pub const MAX_RANK: u8 = 10;
/// Rank of the settebello when held in the coins suit.
pub const SETTEBELLO_RANK: u8 = 7;

/// Represents one of the four suits of a 40-card Italian deck.
/// Which suit counts as "coins" is decided by [`crate::game::RoundConfig`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    /// Batons
    Bastoni,
    /// Cups
    Coppe,
    /// Coins
    Oro,
    /// Swords
    Spade,
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Bastoni, Suit::Coppe, Suit::Oro, Suit::Spade];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Bastoni => "bastoni",
            Suit::Coppe => "coppe",
            Suit::Oro => "oro",
            Suit::Spade => "spade",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a card, unique within a loaded deck.
///
/// Backed by a shared string so cloning a card never copies its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Arc<str>);

impl CardId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single immutable playing card.
///
/// Construction goes through [`Card::new`] (and deserialization through the
/// same checks), so every `Card` in circulation has a rank in `1..=10` and a
/// non-empty id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    suit: Suit,
    rank: u8,
    id: CardId,
}

impl Card {
    pub fn new(suit: Suit, rank: u8, id: impl Into<CardId>) -> Result<Self, DeckError> {
        let id = id.into();
        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(DeckError::InvalidCard {
                reason: format!("rank must be in {MIN_RANK}..={MAX_RANK}, got {rank}"),
            });
        }
        if id.as_str().trim().is_empty() {
            return Err(DeckError::InvalidCard {
                reason: "card id cannot be empty".to_string(),
            });
        }
        Ok(Self { suit, rank, id })
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

#[derive(Deserialize)]
struct RawCard {
    suit: Suit,
    rank: u8,
    id: String,
}

impl TryFrom<RawCard> for Card {
    type Error = DeckError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::new(raw.suit, raw.rank, raw.id)
    }
}

/// Sum of the ranks of `cards`, as used by capture validation.
pub fn rank_sum<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
    cards.into_iter().map(|c| u32::from(c.rank)).sum()
}
