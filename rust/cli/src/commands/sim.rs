//! # Sim Command
//!
//! Plays AI-vs-AI rounds back to back, auditing card conservation after
//! every move. Rounds can be appended to a JSONL file as [`RoundRecord`]s
//! for `verify` to replay later.
//!
//! [`RoundRecord`]: scopa_engine::logger::RoundRecord

use crate::commands::{play_ai_round, resolve_seed};
use crate::config;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::session::{GameSession, RoundSummary};
use crate::ui;
use scopa_ai::create_ai;
use scopa_engine::deck::DeckRegistry;
use scopa_engine::logger::RoundLogger;
use scopa_engine::player::PlayerId;
use scopa_engine::scoring::award_most;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Per-seat tallies; a `None` winner counts as a tie.
#[derive(Debug, Default)]
struct Tally {
    wins: BTreeMap<PlayerId, u32>,
    ties: u32,
}

impl Tally {
    fn add(&mut self, winner: &Option<PlayerId>) {
        match winner {
            Some(p) => *self.wins.entry(p.clone()).or_insert(0) += 1,
            None => self.ties += 1,
        }
    }

    fn wins(&self, p: &PlayerId) -> u32 {
        self.wins.get(p).copied().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct SimStats {
    rounds: u32,
    moves: usize,
    points: BTreeMap<PlayerId, u32>,
    scopas: BTreeMap<PlayerId, u32>,
    rounds_with_scopa: u32,
    round_wins: Tally,
    most_cards: Tally,
    most_coins: Tally,
    primiera: Tally,
    settebello: Tally,
}

impl SimStats {
    fn record(&mut self, summary: &RoundSummary) {
        self.rounds += 1;
        self.moves += summary.moves;
        for (p, pts) in &summary.scores {
            *self.points.entry(p.clone()).or_insert(0) += pts;
        }
        let b = &summary.breakdown;
        for (p, n) in &b.scopas {
            *self.scopas.entry(p.clone()).or_insert(0) += n;
        }
        if b.scopas.values().any(|n| *n > 0) {
            self.rounds_with_scopa += 1;
        }
        self.round_wins.add(&award_most(&summary.scores));
        self.most_cards.add(&b.most_cards);
        self.most_coins.add(&b.most_coins);
        self.primiera.add(&b.primiera);
        self.settebello.add(&b.settebello);
    }
}

fn pct(n: u32, total: u32) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", f64::from(n) / f64::from(total) * 100.0)
}

/// Handle the sim command.
pub fn handle_sim_command(
    rounds: u32,
    output: Option<PathBuf>,
    seed: Option<u64>,
    ai_a: &str,
    ai_b: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        ui::write_error(err, "rounds must be >= 1")?;
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let cfg = config::load()?;
    let seed = resolve_seed(seed, &cfg);
    let a = create_ai(ai_a)?;
    let b = create_ai(ai_b)?;
    let seats: [PlayerId; 2] = ["a".into(), "b".into()];
    let mut session = GameSession::new(
        &DeckRegistry::with_builtin(),
        &cfg.deck,
        seats.clone(),
        cfg.round_config(),
        seed,
        u32::MAX,
    )?;

    let mut logger = match &output {
        Some(path) => {
            ensure_parent_dir(path).map_err(CliError::InvalidInput)?;
            Some(RoundLogger::append(path)?)
        }
        None => None,
    };

    writeln!(
        out,
        "sim: rounds={} seed={} a={} b={}",
        rounds,
        seed,
        a.name(),
        b.name()
    )?;
    info!(rounds, seed, ai_a, ai_b, "simulation started");

    let mut stats = SimStats::default();
    for _ in 0..rounds {
        session.start_round()?;
        let summary = play_ai_round(
            &mut session,
            |p| if *p == seats[0] { a.as_ref() } else { b.as_ref() },
            true,
        )?;
        stats.record(&summary);
        if let Some(logger) = logger.as_mut() {
            let id = logger.next_id();
            if let Some(record) = session.round_record(id) {
                logger.write(&record)?;
            }
        }
    }

    write_summary(out, &stats, &seats, [ai_a, ai_b])?;
    if let Some(path) = output {
        writeln!(out, "Recorded {} round(s) to {}", stats.rounds, path.display())?;
    }
    Ok(())
}

fn write_summary(
    out: &mut dyn Write,
    s: &SimStats,
    seats: &[PlayerId; 2],
    names: [&str; 2],
) -> Result<(), CliError> {
    let n = s.rounds;
    writeln!(out, "Rounds: {}", n)?;
    writeln!(
        out,
        "Moves: {} (avg {:.1} per round)",
        s.moves,
        s.moves as f64 / f64::from(n.max(1))
    )?;
    for (seat, name) in seats.iter().zip(names) {
        let pts = s.points.get(seat).copied().unwrap_or_default();
        writeln!(
            out,
            "{} ({}): {} pts (avg {:.2}), round wins {} ({}), scopas {}",
            seat,
            name,
            pts,
            f64::from(pts) / f64::from(n.max(1)),
            s.round_wins.wins(seat),
            pct(s.round_wins.wins(seat), n),
            s.scopas.get(seat).copied().unwrap_or_default()
        )?;
    }
    writeln!(out, "Round ties: {} ({})", s.round_wins.ties, pct(s.round_wins.ties, n))?;
    writeln!(out, "Rounds with a scopa: {} ({})", s.rounds_with_scopa, pct(s.rounds_with_scopa, n))?;
    for (label, tally) in [
        ("Most cards", &s.most_cards),
        ("Most coins", &s.most_coins),
        ("Primiera", &s.primiera),
        ("Settebello", &s.settebello),
    ] {
        writeln!(
            out,
            "{}: a {} / b {} / ties {}",
            label,
            tally.wins(&seats[0]),
            tally.wins(&seats[1]),
            tally.ties
        )?;
    }
    writeln!(out, "Card conservation: ok")?;
    Ok(())
}
