//! Command handler modules for the Scopa CLI.
//!
//! Each command lives in its own file and follows the same shape:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed in as parameters
//! - Errors propagated via [`CliError`]

mod cfg;
mod deal;
mod eval;
mod play;
mod rng;
mod sim;
mod verify;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use eval::handle_eval_command;
pub use play::handle_play_command;
pub use rng::handle_rng_command;
pub use sim::handle_sim_command;
pub use verify::handle_verify_command;

use crate::config::Config;
use crate::error::CliError;
use crate::formatters::{format_card_id, format_cards};
use crate::session::{GameSession, RoundSummary};
use scopa_ai::AIOpponent;
use scopa_engine::cards::CardId;
use scopa_engine::deck::DECK_SIZE;
use scopa_engine::game::RoundState;
use scopa_engine::logger::MoveRecord;
use scopa_engine::player::PlayerId;
use std::collections::HashSet;

/// Explicit flag, then configured seed, then a random one.
pub(crate) fn resolve_seed(flag: Option<u64>, cfg: &Config) -> u64 {
    flag.or(cfg.seed).unwrap_or_else(rand::random)
}

/// Every card of the deck must sit in exactly one place.
pub(crate) fn check_conservation(state: &RoundState) -> Result<(), String> {
    let mut seen: HashSet<&CardId> = HashSet::new();
    for card in state.all_cards() {
        if !seen.insert(card.id()) {
            return Err(format!("card {} appears twice", card.id()));
        }
    }
    if seen.len() != DECK_SIZE {
        return Err(format!("{} cards in play, expected {}", seen.len(), DECK_SIZE));
    }
    Ok(())
}

/// Plays the current round of `session` to the end, each seat driven by the
/// AI `pick` returns for it, then scores it. With `audit` the card
/// conservation law is checked after every move.
pub(crate) fn play_ai_round<'a>(
    session: &mut GameSession,
    pick: impl Fn(&PlayerId) -> &'a dyn AIOpponent,
    audit: bool,
) -> Result<RoundSummary, CliError> {
    while !session.is_round_over() {
        let Some(state) = session.state() else {
            break;
        };
        let actor = state.current_player().id().clone();
        session.play_ai_turn(pick(&actor))?;
        if audit && let Some(state) = session.state() {
            check_conservation(state).map_err(|msg| {
                CliError::Engine(format!(
                    "round {} move {}: {}",
                    session.round_number(),
                    session.moves().len(),
                    msg
                ))
            })?;
        }
    }
    Ok(session.finish_round()?)
}

/// One-line account of an applied move.
pub(crate) fn describe_move(record: &MoveRecord) -> String {
    let card = format_card_id(&record.card_id);
    if record.capture_ids.is_empty() {
        return format!("{} discards {}", record.player_id, card);
    }
    let taken: Vec<String> = record.capture_ids.iter().map(format_card_id).collect();
    let sweep = if record.scopa { " SCOPA!" } else { "" };
    format!(
        "{} plays {} and captures {}{}",
        record.player_id,
        card,
        taken.join(" + "),
        sweep
    )
}

pub(crate) fn describe_table(state: &RoundState) -> String {
    let table: Vec<_> = state.table().iter().cloned().collect();
    format_cards(&table)
}
