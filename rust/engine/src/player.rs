use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::cards::{Card, CardId};

/// Opaque identifier of a seat in a round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Arc<str>);

impl PlayerId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-round state of one player: the cards in hand, the pile of cards won
/// so far and the number of sweeps scored.
///
/// Hand and pile are persistent vectors, so copying a `PlayerState` shares
/// storage with the original instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    id: PlayerId,
    hand: Vector<Card>,
    captured: Vector<Card>,
    scopas: u32,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            hand: Vector::new(),
            captured: Vector::new(),
            scopas: 0,
        }
    }

    /// Rebuilds a player from recorded parts, e.g. when restoring a snapshot
    /// or setting up a specific position in tests.
    pub fn from_parts(
        id: PlayerId,
        hand: impl IntoIterator<Item = Card>,
        captured: impl IntoIterator<Item = Card>,
        scopas: u32,
    ) -> Self {
        Self {
            id,
            hand: hand.into_iter().collect(),
            captured: captured.into_iter().collect(),
            scopas,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn hand(&self) -> &Vector<Card> {
        &self.hand
    }

    pub fn captured(&self) -> &Vector<Card> {
        &self.captured
    }

    pub fn scopas(&self) -> u32 {
        self.scopas
    }

    pub fn holds(&self, card_id: &CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id() == card_id)
    }

    pub(crate) fn take_from_hand(&mut self, card_id: &CardId) -> Option<Card> {
        let idx = self.hand.iter().position(|c| c.id() == card_id)?;
        Some(self.hand.remove(idx))
    }

    pub(crate) fn receive(&mut self, card: Card) {
        self.hand.push_back(card);
    }

    pub(crate) fn bank(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.captured.extend(cards);
    }

    pub(crate) fn add_scopa(&mut self) {
        self.scopas += 1;
    }
}

/// A move as submitted by a move source (human input or an AI strategy).
///
/// An empty `capture_ids` means the card is discarded onto the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub card_id: CardId,
    #[serde(default)]
    pub capture_ids: Vec<CardId>,
}

impl Move {
    pub fn discard(card_id: CardId) -> Self {
        Self {
            card_id,
            capture_ids: Vec::new(),
        }
    }

    pub fn capture(card_id: CardId, capture_ids: Vec<CardId>) -> Self {
        Self {
            card_id,
            capture_ids,
        }
    }

    pub fn is_discard(&self) -> bool {
        self.capture_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn card(rank: u8, id: &str) -> Card {
        Card::new(Suit::Spade, rank, id).unwrap()
    }

    #[test]
    fn take_from_hand_removes_only_that_card() {
        let mut p = PlayerState::from_parts("p1".into(), vec![card(1, "a"), card(2, "b")], vec![], 0);
        let taken = p.take_from_hand(&CardId::from("a")).unwrap();
        assert_eq!(taken.rank(), 1);
        assert_eq!(p.hand().len(), 1);
        assert!(p.take_from_hand(&CardId::from("a")).is_none());
    }

    #[test]
    fn cloned_player_is_independent() {
        let original = PlayerState::from_parts("p1".into(), vec![card(5, "x")], vec![], 0);
        let mut copy = original.clone();
        copy.bank(vec![card(3, "y")]);
        copy.add_scopa();
        assert!(original.captured().is_empty());
        assert_eq!(original.scopas(), 0);
        assert_eq!(copy.captured().len(), 1);
        assert_eq!(copy.scopas(), 1);
    }

    #[test]
    fn move_without_captures_is_discard() {
        let m: Move = serde_json::from_str(r#"{"card_id":"c"}"#).unwrap();
        assert!(m.is_discard());
        assert!(!Move::capture("c".into(), vec!["t".into()]).is_discard());
    }
}
