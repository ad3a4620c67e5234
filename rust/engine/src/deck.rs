use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit, MAX_RANK, MIN_RANK};
use crate::errors::DeckError;

/// Number of cards every playable deck must yield.
pub const DECK_SIZE: usize = 40;

/// Name of the deck registered by [`DeckRegistry::with_builtin`].
pub const NAPOLITANE: &str = "napolitane";

/// Describes how a deck is built: which suits and which ranks, in the order
/// cards are produced by [`load_deck`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDefinition {
    pub name: String,
    pub suits: Vec<Suit>,
    pub ranks: Vec<u8>,
}

impl DeckDefinition {
    /// The traditional Neapolitan deck: four suits, ranks 1 through 10.
    pub fn napolitane() -> Self {
        Self {
            name: NAPOLITANE.to_string(),
            suits: Suit::ALL.to_vec(),
            ranks: (MIN_RANK..=MAX_RANK).collect(),
        }
    }

    pub fn expected_card_count(&self) -> usize {
        self.suits.len() * self.ranks.len()
    }

    /// Collects every structural problem at once, so a broken definition can
    /// be fixed in a single pass.
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("deck name cannot be empty".to_string());
        }

        let mut seen_suits: Vec<Suit> = Vec::new();
        for s in &self.suits {
            if seen_suits.contains(s) {
                problems.push(format!("duplicate suit: {s}"));
            } else {
                seen_suits.push(*s);
            }
        }

        let mut seen_ranks: Vec<u8> = Vec::new();
        for r in &self.ranks {
            if seen_ranks.contains(r) {
                problems.push(format!("duplicate rank: {r}"));
            } else {
                seen_ranks.push(*r);
            }
            if !(MIN_RANK..=MAX_RANK).contains(r) {
                problems.push(format!("rank {r} outside {MIN_RANK}..={MAX_RANK}"));
            }
        }

        let count = self.expected_card_count();
        if count != DECK_SIZE {
            problems.push(format!(
                "deck must define exactly {DECK_SIZE} cards ({} suits x {} ranks = {count})",
                self.suits.len(),
                self.ranks.len()
            ));
        }
        problems
    }
}

/// An explicit collection of deck definitions, passed to whoever needs to
/// load a deck. Names are listed in registration order.
#[derive(Debug, Clone, Default)]
pub struct DeckRegistry {
    decks: Vec<DeckDefinition>,
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in Neapolitan deck.
    pub fn with_builtin() -> Self {
        Self {
            decks: vec![DeckDefinition::napolitane()],
        }
    }

    /// Validates `deck` and registers it, replacing any deck of the same name.
    ///
    /// # Errors
    ///
    /// [`DeckError::InvalidDefinition`] listing every violated constraint.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopa_engine::cards::Suit;
    /// use scopa_engine::deck::{DeckDefinition, DeckRegistry};
    /// use scopa_engine::errors::DeckError;
    ///
    /// let mut registry = DeckRegistry::new();
    /// let broken = DeckDefinition {
    ///     name: " ".into(),
    ///     suits: vec![Suit::Oro, Suit::Oro],
    ///     ranks: (1..=10).collect(),
    /// };
    /// match registry.register(broken) {
    ///     Err(DeckError::InvalidDefinition { problems, .. }) => assert_eq!(problems.len(), 3),
    ///     other => panic!("unexpected: {other:?}"),
    /// }
    /// ```
    pub fn register(&mut self, deck: DeckDefinition) -> Result<(), DeckError> {
        let problems = deck.problems();
        if !problems.is_empty() {
            return Err(DeckError::InvalidDefinition {
                name: deck.name,
                problems,
            });
        }
        match self.decks.iter_mut().find(|d| d.name == deck.name) {
            Some(existing) => *existing = deck,
            None => self.decks.push(deck),
        }
        Ok(())
    }

    /// Removes `name`; unknown names are ignored.
    pub fn unregister(&mut self, name: &str) {
        self.decks.retain(|d| d.name != name);
    }

    pub fn get(&self, name: &str) -> Result<&DeckDefinition, DeckError> {
        self.decks
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| DeckError::NotFound {
                name: name.to_string(),
                available: self.list(),
            })
    }

    pub fn list(&self) -> Vec<String> {
        self.decks.iter().map(|d| d.name.clone()).collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.decks.iter().any(|d| d.name == name)
    }
}

/// Builds the cards of the deck registered under `name`, suit-major and
/// rank-minor, with ids of the form `"{deck}::{suit}::{rank}"`.
pub fn load_deck(registry: &DeckRegistry, name: &str) -> Result<Vec<Card>, DeckError> {
    let def = registry.get(name)?;
    let mut cards = Vec::with_capacity(def.expected_card_count());
    for suit in &def.suits {
        for rank in &def.ranks {
            let id = format!("{}::{}::{}", def.name, suit, rank);
            cards.push(Card::new(*suit, *rank, id)?);
        }
    }
    if cards.len() != DECK_SIZE {
        return Err(DeckError::Incomplete {
            name: def.name.clone(),
            expected: DECK_SIZE,
            got: cards.len(),
        });
    }
    Ok(cards)
}

/// Returns a copy of `cards` shuffled with a ChaCha20 stream seeded from
/// `seed`. The same seed always yields the same order.
pub fn shuffled(cards: &[Card], seed: u64) -> Vec<Card> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut out = cards.to_vec();
    out.shuffle(&mut rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_deck_loads_forty_cards_in_suit_major_order() {
        let registry = DeckRegistry::with_builtin();
        let cards = load_deck(&registry, NAPOLITANE).unwrap();
        assert_eq!(cards.len(), DECK_SIZE);
        assert_eq!(cards[0].id().as_str(), "napolitane::bastoni::1");
        assert_eq!(cards[9].id().as_str(), "napolitane::bastoni::10");
        assert_eq!(cards[10].suit(), Suit::Coppe);
        assert_eq!(cards[39].id().as_str(), "napolitane::spade::10");
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let cards = load_deck(&DeckRegistry::with_builtin(), NAPOLITANE).unwrap();
        let a = shuffled(&cards, 7);
        let b = shuffled(&cards, 7);
        let c = shuffled(&cards, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), cards.len());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = DeckRegistry::with_builtin();
        let mut def = DeckDefinition::napolitane();
        def.suits.reverse();
        registry.register(def).unwrap();
        assert_eq!(registry.list(), vec![NAPOLITANE.to_string()]);
        let cards = load_deck(&registry, NAPOLITANE).unwrap();
        assert_eq!(cards[0].suit(), Suit::Spade);
    }
}
