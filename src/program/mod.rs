//! Program model for the workout engine.
//!
//! A [`Program`] is an ordered list of [`Exercise`] entries plus a lap
//! count. It is authored elsewhere and handed to the execution engine as
//! a read-only value; the engine never mutates it.

mod error;

pub use error::ProgramError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Exercise
// ============================================================================

/// A single exercise within a program.
///
/// `work_seconds` is the active interval, `rest_seconds` the pause that
/// follows it (0 means the next exercise starts immediately).
/// `repeat_count` scales the exercise's contribution to the aggregate
/// duration; it does not affect execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Display name of the exercise
    pub name: String,
    /// Work interval in seconds (authoring layer guarantees > 0)
    pub work_seconds: u32,
    /// Rest interval in seconds (0 skips the rest phase)
    pub rest_seconds: u32,
    /// Repeat multiplier for duration aggregation
    pub repeat_count: u32,
    /// Position within the program; unique per program
    pub order: u32,
    /// Optional free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    /// Creates an exercise with the given name, durations and position.
    pub fn new(name: impl Into<String>, work_seconds: u32, rest_seconds: u32, order: u32) -> Self {
        Self {
            name: name.into(),
            work_seconds,
            rest_seconds,
            repeat_count: 1,
            order,
            notes: None,
        }
    }

    /// Sets the repeat multiplier.
    #[must_use]
    pub fn with_repeat_count(mut self, repeat_count: u32) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Attaches free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

// ============================================================================
// Program
// ============================================================================

/// An interval-training program.
///
/// The canonical exercise sequence is `exercises` sorted by `order`
/// ascending; [`Program::sorted_exercises`] exposes it. A program is
/// immutable for the lifetime of any workout session that references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Display name of the program
    pub name: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Exercises in authoring order (not necessarily sorted)
    pub exercises: Vec<Exercise>,
    /// Number of passes through the full exercise sequence (>= 1)
    pub laps: u32,
    /// Whether the program is publicly visible
    pub is_public: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Identifier of the authoring user, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Program {
    /// Creates a single-lap, private program with the given exercises.
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        Self {
            name: name.into(),
            description: None,
            exercises,
            laps: 1,
            is_public: false,
            created_at: Utc::now(),
            owner_id: None,
        }
    }

    /// Sets the lap count.
    #[must_use]
    pub fn with_laps(mut self, laps: u32) -> Self {
        self.laps = laps;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the program as publicly visible.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Sets the authoring user id.
    #[must_use]
    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Returns the exercises sorted by `order` ascending.
    ///
    /// The sort is stable, so exercises sharing an `order` value (invalid
    /// data, but tolerated) keep their insertion order. Callers that need
    /// this on every tick should cache the result; `WorkoutSession` does.
    #[must_use]
    pub fn sorted_exercises(&self) -> Vec<Exercise> {
        let mut sorted = self.exercises.clone();
        sorted.sort_by_key(|e| e.order);
        sorted
    }

    /// Total duration of the program in seconds:
    /// `laps * sum((work + rest) * repeat_count)`.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u32 {
        let per_lap: u32 = self
            .exercises
            .iter()
            .map(|e| (e.work_seconds + e.rest_seconds) * e.repeat_count)
            .sum();
        per_lap * self.laps
    }

    /// Human-readable total duration: `"<m> min <s> s"`, or `"<s> s"`
    /// when under a minute.
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        let total = self.total_duration_seconds();
        let minutes = total / 60;
        let seconds = total % 60;
        if minutes > 0 {
            format!("{} min {} s", minutes, seconds)
        } else {
            format!("{} s", seconds)
        }
    }

    /// Validates the program for authoring purposes.
    ///
    /// The execution engine does not call this; it tolerates any program
    /// it is handed. Authoring layers should call it before persisting.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgramError`] describing the first violation found.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.exercises.is_empty() {
            return Err(ProgramError::NoExercises);
        }
        if self.laps < 1 {
            return Err(ProgramError::InvalidLaps(self.laps));
        }
        let mut seen_orders = std::collections::HashSet::new();
        for exercise in &self.exercises {
            if exercise.work_seconds == 0 {
                return Err(ProgramError::ZeroWorkDuration(exercise.name.clone()));
            }
            if exercise.repeat_count < 1 {
                return Err(ProgramError::InvalidRepeatCount(exercise.name.clone()));
            }
            if !seen_orders.insert(exercise.order) {
                return Err(ProgramError::DuplicateOrder(exercise.order));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
