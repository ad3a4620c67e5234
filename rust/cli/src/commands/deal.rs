//! Deal command: shows the opening position of one round.

use crate::commands::{describe_table, resolve_seed};
use crate::config;
use crate::error::CliError;
use crate::formatters::format_card;
use scopa_engine::deck::{DeckRegistry, load_deck};
use scopa_engine::engine::start_round;
use scopa_engine::player::PlayerId;
use std::io::Write;

/// Deals a round with the configured deck and rules and prints the table,
/// both hands and what is left in the deck.
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let cfg = config::load()?;
    let seed = resolve_seed(seed, &cfg);
    let deck = load_deck(&DeckRegistry::with_builtin(), &cfg.deck)?;
    let seats: [PlayerId; 2] = ["p1".into(), "p2".into()];
    let state = start_round(&deck, &seats, cfg.round_config(), seed)?;

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Table: {}", describe_table(&state))?;
    for player in state.players() {
        let hand: Vec<String> = player.hand().iter().map(format_card).collect();
        writeln!(out, "{}: [{}]", player.id(), hand.join(", "))?;
    }
    writeln!(out, "Deck: {} cards remaining", state.deck().len())?;
    writeln!(out, "First to play: {}", state.current_player().id())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_deal() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        handle_deal_command(Some(7), &mut a).unwrap();
        handle_deal_command(Some(7), &mut b).unwrap();
        assert_eq!(a, b);
        let text = String::from_utf8(a).unwrap();
        assert!(text.starts_with("Seed: 7\nTable: ["));
        assert!(text.contains("Deck: 30 cards remaining"));
        assert!(text.contains("First to play: p1"));
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        handle_deal_command(Some(1), &mut a).unwrap();
        handle_deal_command(Some(2), &mut b).unwrap();
        assert_ne!(a, b);
    }
}
