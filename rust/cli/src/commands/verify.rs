//! # Verify Command
//!
//! Replays every recorded round through the engine from its deck and seed.
//! A record fails when a move is rejected, a scopa flag disagrees with
//! what the engine saw, the moves stop before the round is over, or the
//! recorded scores differ from the engine's.

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::strip_utf8_bom;
use crate::ui;
use scopa_engine::deck::{DeckRegistry, load_deck};
use scopa_engine::engine::{deal_if_needed, is_round_over, play_move, score_round, start_round};
use scopa_engine::logger::{RoundRecord, read_records};
use scopa_engine::player::PlayerId;
use scopa_engine::scoring::ScoreBreakdown;
use std::io::{Cursor, Write};
use std::path::Path;

/// Handle the verify command.
pub fn handle_verify_command(
    input: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = std::fs::read_to_string(input)?;
    let records = read_records(Cursor::new(strip_utf8_bom(&content)))?;
    let registry = DeckRegistry::with_builtin();

    let mut failures: Vec<BatchValidationError<String>> = Vec::new();
    for (line, parsed) in &records {
        let outcome = match parsed {
            Ok(record) => replay(&registry, record).map_err(|msg| (record.round_id.as_str(), msg)),
            Err(e) => Err(("unparsed", e.clone())),
        };
        if let Err((round_id, message)) = outcome {
            failures.push(BatchValidationError {
                item_context: format!("line {} ({})", line, round_id),
                message,
            });
        }
    }

    let total = records.len();
    writeln!(
        out,
        "verify: {}/{} round(s) valid",
        total - failures.len(),
        total
    )?;
    if failures.is_empty() {
        return Ok(());
    }
    for failure in &failures {
        ui::write_error(err, &failure.to_string())?;
    }
    Err(CliError::InvalidInput(format!(
        "{} invalid record(s) in {}",
        failures.len(),
        input.display()
    )))
}

/// Replays one record; the error names the first discrepancy.
fn replay(registry: &DeckRegistry, record: &RoundRecord) -> Result<(), String> {
    let deck = load_deck(registry, &record.deck).map_err(|e| e.to_string())?;
    let seats: [PlayerId; 2] = record
        .players
        .clone()
        .try_into()
        .map_err(|p: Vec<PlayerId>| format!("expected 2 players, found {}", p.len()))?;
    let mut state =
        start_round(&deck, &seats, record.config.clone(), record.seed).map_err(|e| e.to_string())?;

    for (i, mv) in record.moves.iter().enumerate() {
        let before = state.player(&mv.player_id).map(|p| p.scopas()).unwrap_or_default();
        let next = play_move(&state, &mv.player_id, &mv.card_id, &mv.capture_ids)
            .map_err(|e| format!("move {}: {}", i + 1, e))?;
        let swept = next.player(&mv.player_id).map(|p| p.scopas()).unwrap_or_default() > before;
        if swept != mv.scopa {
            return Err(format!(
                "move {}: recorded scopa={} but engine says {}",
                i + 1,
                mv.scopa,
                swept
            ));
        }
        state = deal_if_needed(&next);
    }

    if !is_round_over(&state) {
        return Err(format!("round not over after {} moves", record.moves.len()));
    }
    let scored = score_round(&state).map_err(|e| e.to_string())?;
    if scored.scores() != &record.scores {
        return Err(format!(
            "scores differ: recorded {:?}, replayed {:?}",
            record.scores,
            scored.scores()
        ));
    }
    if let Some(breakdown) = &record.breakdown
        && *breakdown != ScoreBreakdown::for_state(&scored)
    {
        return Err("score breakdown differs from replay".to_string());
    }
    Ok(())
}
