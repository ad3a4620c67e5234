//! # Eval Command
//!
//! Head-to-head comparison of two AIs. Seats swap every round so neither
//! side keeps the first move; round `i` is dealt from `seed + i`.

use crate::commands::{play_ai_round, resolve_seed};
use crate::config;
use crate::error::CliError;
use crate::session::GameSession;
use scopa_ai::create_ai;
use scopa_engine::deck::DeckRegistry;
use scopa_engine::player::PlayerId;
use std::io::Write;

#[derive(Debug, Default, Clone, Copy)]
struct Side {
    points: u32,
    round_wins: u32,
}

/// Handle the eval command.
pub fn handle_eval_command(
    ai_a: &str,
    ai_b: &str,
    rounds: u32,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        return Err(CliError::InvalidInput("rounds must be >= 1".to_string()));
    }
    let cfg = config::load()?;
    let seed = resolve_seed(seed, &cfg);
    let registry = DeckRegistry::with_builtin();
    let a = create_ai(ai_a)?;
    let b = create_ai(ai_b)?;
    let a_id: PlayerId = "a".into();
    let b_id: PlayerId = "b".into();

    let mut sides = [Side::default(); 2];
    let mut ties = 0u32;
    for i in 0..rounds {
        let seats = if i % 2 == 0 {
            [a_id.clone(), b_id.clone()]
        } else {
            [b_id.clone(), a_id.clone()]
        };
        let mut session = GameSession::new(
            &registry,
            &cfg.deck,
            seats,
            cfg.round_config(),
            seed.wrapping_add(u64::from(i)),
            u32::MAX,
        )?;
        session.start_round()?;
        let summary = play_ai_round(
            &mut session,
            |p| if *p == a_id { a.as_ref() } else { b.as_ref() },
            false,
        )?;
        let pa = summary.scores.get(&a_id).copied().unwrap_or_default();
        let pb = summary.scores.get(&b_id).copied().unwrap_or_default();
        sides[0].points += pa;
        sides[1].points += pb;
        match pa.cmp(&pb) {
            std::cmp::Ordering::Greater => sides[0].round_wins += 1,
            std::cmp::Ordering::Less => sides[1].round_wins += 1,
            std::cmp::Ordering::Equal => ties += 1,
        }
    }

    writeln!(
        out,
        "eval: {} vs {} rounds={} seed={}",
        a.name(),
        b.name(),
        rounds,
        seed
    )?;
    for (label, side) in [(ai_a, sides[0]), (ai_b, sides[1])] {
        writeln!(
            out,
            "{}: {} pts (avg {:.2}), round wins {}",
            label,
            side.points,
            f64::from(side.points) / f64::from(rounds),
            side.round_wins
        )?;
    }
    writeln!(out, "Ties: {}", ties)?;
    Ok(())
}
