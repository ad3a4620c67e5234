//! UI helper functions for terminal output formatting.
//!
//! Everything here writes to the streams it is given, so commands stay
//! testable with in-memory buffers.

use crate::formatters::{format_card, format_cards};
use scopa_engine::game::PublicView;
use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Table, scores and the viewer's hand, numbered for selection.
pub fn render_view(out: &mut dyn Write, view: &PublicView, round: u32) -> std::io::Result<()> {
    writeln!(
        out,
        "Round {} | deck: {} left | turn: {}",
        round, view.deck_remaining, view.current_player_id
    )?;
    writeln!(out, "Table: {}", format_cards(&view.table))?;
    for seat in &view.seats {
        writeln!(
            out,
            "  {}: {} in hand, {} captured, {} scopa(s), {} pts",
            seat.id,
            seat.hand_count,
            seat.captured_count,
            seat.scopas,
            view.scores.get(&seat.id).copied().unwrap_or_default()
        )?;
    }
    writeln!(out, "Your hand:")?;
    for (i, card) in view.hand.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, format_card(card))?;
    }
    Ok(())
}
