//! # Play Command
//!
//! A match against the configured AI, first to the target score with a
//! strict lead. Two modes:
//!
//! - **Human vs AI**: the human picks a hand card, then a capture option
//!   (or `d` to discard, `b` to pick another card); `q` quits
//! - **AI vs AI**: the configured AI plays both seats

use crate::cli::Vs;
use crate::commands::{describe_move, describe_table, resolve_seed};
use crate::config;
use crate::error::CliError;
use crate::formatters::{format_breakdown, format_card, format_card_id};
use crate::io_utils::read_stdin_line;
use crate::session::{GameSession, RoundSummary};
use crate::ui;
use crate::validation::{CaptureChoice, ParseResult, parse_capture_choice, parse_card_choice};
use scopa_ai::create_ai;
use scopa_engine::deck::DeckRegistry;
use scopa_engine::player::{Move, PlayerId};
use std::io::{BufRead, Write};

const HUMAN: &str = "human";
const CPU: &str = "cpu";

/// Handle the play command.
///
/// `rounds` caps the match length; without it play continues until a seat
/// wins. Quitting mid-match returns [`CliError::Interrupted`].
pub fn handle_play_command(
    vs: Vs,
    rounds: Option<u32>,
    seed: Option<u64>,
    ai: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if rounds == Some(0) {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let cfg = config::load()?;
    let ai_name = ai.unwrap_or_else(|| cfg.ai.clone());
    let opponent = create_ai(&ai_name)?;
    let seed = resolve_seed(seed, &cfg);

    let seats: [PlayerId; 2] = match vs {
        Vs::Human => [HUMAN.into(), CPU.into()],
        Vs::Ai => ["cpu-1".into(), "cpu-2".into()],
    };
    let mut session = GameSession::new(
        &DeckRegistry::with_builtin(),
        &cfg.deck,
        seats.clone(),
        cfg.round_config(),
        seed,
        cfg.target_score,
    )?;

    writeln!(
        out,
        "play: vs={} ai={} seed={} target={}",
        vs.as_str(),
        opponent.name(),
        seed,
        cfg.target_score
    )?;

    let human: Option<PlayerId> = matches!(vs, Vs::Human).then(|| seats[0].clone());
    loop {
        let table = describe_table(session.start_round()?);
        writeln!(out, "\n== Round {} ==", session.round_number())?;
        writeln!(out, "Table: {}", table)?;

        while !session.is_round_over() {
            let Some(state) = session.state() else {
                break;
            };
            let actor = state.current_player().id().clone();
            if human.as_ref() == Some(&actor) {
                if !human_turn(&mut session, &actor, out, err, stdin)? {
                    writeln!(out, "Quit. Totals: {}", totals_line(&session))?;
                    return Err(CliError::Interrupted("player quit".to_string()));
                }
            } else {
                session.play_ai_turn(opponent.as_ref())?;
            }
            if let Some(record) = session.moves().last() {
                writeln!(out, "{}", describe_move(record))?;
            }
        }

        let summary = session.finish_round()?;
        write_round_result(out, &summary)?;

        if let Some(winner) = session.winner() {
            writeln!(out, "Match winner: {}", winner)?;
            break;
        }
        if rounds.is_some_and(|cap| session.round_number() >= cap) {
            writeln!(out, "Match stopped after {} round(s)", session.round_number())?;
            break;
        }
    }
    writeln!(out, "Final totals: {}", totals_line(&session))?;
    Ok(())
}

fn totals_line(session: &GameSession) -> String {
    session
        .totals()
        .iter()
        .map(|(p, pts)| format!("{}={}", p, pts))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_round_result(out: &mut dyn Write, summary: &RoundSummary) -> Result<(), CliError> {
    writeln!(out, "Round {} complete", summary.round_number)?;
    writeln!(out, "{}", format_breakdown(&summary.breakdown))?;
    let totals: Vec<String> = summary
        .totals
        .iter()
        .map(|(p, pts)| format!("{}={}", p, pts))
        .collect();
    writeln!(out, "Match totals: {}", totals.join(" "))?;
    Ok(())
}

/// Runs one human turn. Returns `Ok(false)` when the player quits or input
/// runs out.
fn human_turn(
    session: &mut GameSession,
    me: &PlayerId,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<bool, CliError> {
    let view = session.public_view(me)?;
    ui::render_view(out, &view, session.round_number())?;

    loop {
        write!(out, "Choose a card [1-{}] or q: ", view.hand.len())?;
        out.flush()?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        let card = match parse_card_choice(&line, view.hand.len()) {
            ParseResult::Choice(i) => &view.hand[i],
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };

        let options = session.legal_captures(me, card.id())?;
        if options.is_empty() {
            writeln!(out, "{} cannot capture.", format_card(card))?;
            write!(out, "Enter or d to discard, b to go back: ")?;
        } else {
            for (i, option) in options.iter().enumerate() {
                let labels: Vec<String> = option.iter().map(format_card_id).collect();
                writeln!(out, "  [{}] {}", i + 1, labels.join(" + "))?;
            }
            write!(
                out,
                "Choose a capture [1-{}], d to discard, b to go back: ",
                options.len()
            )?;
        }
        out.flush()?;

        let Some(line) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        let mv = match parse_capture_choice(&line, options.len()) {
            ParseResult::Choice(CaptureChoice::Take(i)) => {
                Move::capture(card.id().clone(), options[i].clone())
            }
            ParseResult::Choice(CaptureChoice::Discard) => Move::discard(card.id().clone()),
            ParseResult::Choice(CaptureChoice::Back) => continue,
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };

        match session.submit_move(me, &mv) {
            Ok(_) => return Ok(true),
            Err(e) => ui::write_error(err, &e.to_string())?,
        }
    }
}
