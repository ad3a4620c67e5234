//! Random number generator check.
//!
//! Prints raw ChaCha20 output for a seed next to the head of the deck
//! shuffle the engine derives from the same seed, so a reported seed can
//! be checked by eye across machines.

use crate::error::CliError;
use crate::formatters::format_card;
use rand::{RngCore, SeedableRng};
use scopa_engine::deck::{DeckRegistry, NAPOLITANE, load_deck, shuffled};
use std::io::Write;

const SHOWN: usize = 5;

pub fn handle_rng_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(s);
    let vals: Vec<u64> = (0..SHOWN).map(|_| rng.next_u64()).collect();
    writeln!(out, "Seed: {}", s)?;
    writeln!(out, "RNG sample: {:?}", vals)?;

    let deck = load_deck(&DeckRegistry::with_builtin(), NAPOLITANE)?;
    let head: Vec<String> = shuffled(&deck, s).iter().take(SHOWN).map(format_card).collect();
    writeln!(out, "Shuffle head: {}", head.join(", "))?;
    Ok(())
}
