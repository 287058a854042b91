//! Program validation error types.
//!
//! These errors are produced by [`Program::validate`](super::Program::validate)
//! for the authoring layer. The execution engine never validates a program;
//! it treats whatever it is handed as defined boundary behavior.

use thiserror::Error;

/// Errors that make a program invalid for authoring purposes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    /// The program contains no exercises.
    #[error("program has no exercises")]
    NoExercises,

    /// The lap count is below the minimum of 1.
    #[error("lap count must be at least 1, got {0}")]
    InvalidLaps(u32),

    /// An exercise has a zero work duration.
    #[error("exercise \"{0}\" has a zero work duration")]
    ZeroWorkDuration(String),

    /// An exercise has a repeat count below the minimum of 1.
    #[error("exercise \"{0}\" has a repeat count below 1")]
    InvalidRepeatCount(String),

    /// Two exercises share the same order value.
    #[error("duplicate exercise order value {0}")]
    DuplicateOrder(u32),
}
