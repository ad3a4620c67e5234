//! Error types for the CLI application.
//!
//! Every subcommand returns `Result<(), CliError>`; [`crate::run`] maps the
//! variants onto exit codes.

use std::fmt;

use scopa_ai::AiError;
use scopa_engine::errors::{DeckError, GameError};

use crate::config::ConfigError;
use crate::session::SessionError;

#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Rules engine, deck or AI failure
    Engine(String),

    /// Operation was interrupted (e.g., the player quit mid-round)
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<DeckError> for CliError {
    fn from(error: DeckError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<AiError> for CliError {
    fn from(error: AiError) -> Self {
        CliError::Engine(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Snapshot(msg) => CliError::InvalidInput(msg),
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

/// One failed item of a batch command, tagged with what identifies it.
///
/// ```rust
/// use scopa_cli::BatchValidationError;
///
/// let error = BatchValidationError {
///     item_context: "line 5",
///     message: "scores differ".to_string(),
/// };
/// assert_eq!(error.to_string(), "line 5: scores differ");
/// ```
#[derive(Debug)]
pub struct BatchValidationError<T> {
    pub item_context: T,
    pub message: String,
}

impl<T: fmt::Display> fmt::Display for BatchValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item_context, self.message)
    }
}
