//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scopa", version, about = "Scopa rules engine CLI")]
pub struct ScopaCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a match against the AI, or watch two AIs play
    Play {
        #[arg(long, value_enum)]
        vs: Vs,
        /// Stop after this many rounds even if nobody reached the target
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Opponent strategy (greedy, random)
        #[arg(long)]
        ai: Option<String>,
    },
    /// Deal one round and print the opening position
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play AI-vs-AI rounds, optionally recording them as JSONL
    Sim {
        #[arg(long)]
        rounds: u32,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "greedy")]
        ai_a: String,
        #[arg(long, default_value = "random")]
        ai_b: String,
    },
    /// Compare two AIs head to head, swapping seats every round
    Eval {
        #[arg(long)]
        ai_a: String,
        #[arg(long)]
        ai_b: String,
        #[arg(long, default_value_t = 100)]
        rounds: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replay recorded rounds through the engine and check their scores
    Verify {
        #[arg(long)]
        input: PathBuf,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
    /// Print a ChaCha20 sample and the shuffle it produces
    Rng {
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Who sits opposite the configured AI in `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Vs {
    /// Play from the terminal against the AI.
    Human,
    /// Watch the AI play itself.
    Ai,
}

impl Vs {
    /// ```
    /// # use scopa_cli::Vs;
    /// assert_eq!(Vs::Ai.as_str(), "ai");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Vs::Human => "human",
            Vs::Ai => "ai",
        }
    }
}
