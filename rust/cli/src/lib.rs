//! # Scopa CLI Library
//!
//! Command-line front end for the Scopa rules engine: interactive matches,
//! AI simulations with JSONL round records, replay verification and
//! configuration inspection.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments and executes a subcommand against the real
//! stdin; [`run_with_input`] takes the input stream explicitly.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["scopa", "play", "--vs", "ai", "--rounds", "3"];
//! let code = scopa_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play a match against the AI, or watch an AI-vs-AI match
//! - `deal`: Deal a single round for inspection
//! - `sim`: Run AI-vs-AI rounds and optionally record them
//! - `eval`: Compare two AIs head to head
//! - `verify`: Replay recorded rounds through the engine
//! - `cfg`: Display current configuration settings
//! - `rng`: Verify RNG output for a seed

use clap::Parser;
use std::io::{BufRead, Write};

pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
pub mod session;
pub mod ui;
pub mod validation;

use cli::{Commands, ScopaCli};
use commands::{
    handle_cfg_command, handle_deal_command, handle_eval_command, handle_play_command,
    handle_rng_command, handle_sim_command, handle_verify_command,
};

pub use cli::Vs;
pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "deal", "sim", "eval", "verify", "cfg", "rng"];

/// Main entry point for the CLI application.
///
/// Returns the process exit code: `0` for success, `2` for errors, `130`
/// when the player quits a match.
///
/// ```
/// use std::io;
/// let args = vec!["scopa", "deal", "--seed", "42"];
/// let code = scopa_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, &mut stdin_lock, out, err)
}

/// [`run`] with an explicit input stream for interactive commands.
pub fn run_with_input<I, S>(
    args: I,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match ScopaCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play { vs, rounds, seed, ai } => {
            handle_play_command(vs, rounds, seed, ai, out, err, stdin)
        }
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Sim {
            rounds,
            output,
            seed,
            ai_a,
            ai_b,
        } => handle_sim_command(rounds, output, seed, &ai_a, &ai_b, out, err),
        Commands::Eval {
            ai_a,
            ai_b,
            rounds,
            seed,
        } => handle_eval_command(&ai_a, &ai_b, rounds, seed, out),
        Commands::Verify { input } => handle_verify_command(&input, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Rng { seed } => handle_rng_command(seed, out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(_)) => exit_code::INTERRUPTED,
        Err(e) => {
            if writeln!(err, "Error: {}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err).is_err()
                || writeln!(err, "Scopa CLI").is_err()
                || writeln!(err, "Usage: scopa <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return exit_code::ERROR;
            }
            for c in COMMANDS {
                if writeln!(err, "  {}", c).is_err() {
                    return exit_code::ERROR;
                }
            }
            let _ = writeln!(err, "\nFor full help, run: scopa --help");
            exit_code::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_capture(args: &[&str], input: &str) -> (i32, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut stdin = Cursor::new(input.as_bytes().to_vec());
        let code = run_with_input(args.iter().copied(), &mut stdin, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, out, err) = run_capture(&["scopa", "--help"], "");
        assert_eq!(code, 0);
        assert!(out.contains("Usage"));
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_lists_commands() {
        let (code, _, err) = run_capture(&["scopa", "bench"], "");
        assert_eq!(code, 2);
        for c in COMMANDS {
            assert!(err.contains(&format!("  {}\n", c)), "missing {c}");
        }
    }

    #[test]
    fn deal_dispatch() {
        let (code, out, _) = run_capture(&["scopa", "deal", "--seed", "3"], "");
        assert_eq!(code, 0);
        assert!(out.starts_with("Seed: 3"));
    }

    #[test]
    fn quit_maps_to_interrupted_code() {
        let (code, _, _) = run_capture(&["scopa", "play", "--vs", "human", "--seed", "1"], "q\n");
        assert_eq!(code, exit_code::INTERRUPTED);
    }

    #[test]
    fn command_errors_map_to_two() {
        let (code, _, err) = run_capture(&["scopa", "sim", "--rounds", "1", "--ai-a", "oracle"], "");
        assert_eq!(code, 2);
        assert!(err.contains("Error: Engine error: Unknown AI type: oracle"));
    }
}
