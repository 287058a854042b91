//! Workout Timer Library
//!
//! This library provides the execution engine for interval-training
//! workouts. It includes:
//! - Program model: ordered exercises with work/rest durations, repeat
//!   multipliers and a program-level lap count
//! - Workout session: mutable run state with derived read-only views
//!   (progress, formatted time, next-exercise lookahead)
//! - Execution engine: a tokio-driven phase state machine (countdown,
//!   work, rest, exercise advancement, lap repetition, completion) with
//!   pause/resume, manual skip and stop/reset
//! - Feedback sink abstraction for haptic/audio cues, with no-op and
//!   mock implementations
//!
//! Persistence, authoring, identity and presentation are external; the
//! engine consumes a read-only [`Program`] and exposes events and
//! snapshots for observers.

pub mod engine;
pub mod feedback;
pub mod logging;
pub mod program;
pub mod session;

// Re-export commonly used types for convenience
pub use engine::{WorkoutEngine, WorkoutEvent};
pub use feedback::{FeedbackCue, FeedbackError, FeedbackSink, MockFeedbackSink, NoopFeedback};
pub use program::{Exercise, Program, ProgramError};
pub use session::{SessionSnapshot, WorkoutPhase, WorkoutSession, COUNTDOWN_SECONDS};
