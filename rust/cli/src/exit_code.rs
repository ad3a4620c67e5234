//! Exit codes returned by [`crate::run`].

/// Success exit code (standard Unix convention).
pub const SUCCESS: i32 = 0;

/// Invalid arguments, bad configuration, engine or I/O failure.
pub const ERROR: i32 = 2;

/// The player quit before the match was decided.
pub const INTERRUPTED: i32 = 130;
