//! Run-time workout state.
//!
//! This module defines the data structures observed by presentation
//! layers while a workout runs:
//! - [`WorkoutPhase`]: the state of the phase state machine
//! - [`WorkoutSession`]: mutable run state plus pure derived accessors
//! - [`SessionSnapshot`]: serializable point-in-time view of a session
//!
//! A session is created fresh for each run and mutated exclusively by the
//! execution engine; observers read it through the accessors or a snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::program::{Exercise, Program};

/// Length of the pre-roll countdown entered on the first start of a run.
pub const COUNTDOWN_SECONDS: u32 = 3;

// ============================================================================
// WorkoutPhase
// ============================================================================

/// Represents the current phase of a workout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutPhase {
    /// Run has not started yet
    Idle,
    /// Pre-roll countdown before the first exercise
    Countdown,
    /// Active work interval
    Working,
    /// Rest interval between work phases
    Resting,
    /// Run has completed; terminal until the session is reset
    Finished,
}

impl WorkoutPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutPhase::Idle => "idle",
            WorkoutPhase::Countdown => "countdown",
            WorkoutPhase::Working => "working",
            WorkoutPhase::Resting => "resting",
            WorkoutPhase::Finished => "finished",
        }
    }

    /// Returns true if the phase has a running interval timer.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            WorkoutPhase::Countdown | WorkoutPhase::Working | WorkoutPhase::Resting
        )
    }
}

impl Default for WorkoutPhase {
    fn default() -> Self {
        WorkoutPhase::Idle
    }
}

// ============================================================================
// WorkoutSession
// ============================================================================

/// The mutable state of one in-progress (or finished) workout execution.
///
/// Holds a shared, read-only [`Program`] and a pre-sorted snapshot of its
/// exercises, taken once at construction so per-tick lookups are cheap.
/// The engine mutates the public fields; everything else is derived.
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    id: Uuid,
    program: Arc<Program>,
    exercises: Vec<Exercise>,
    /// Index into the sorted exercise sequence
    pub exercise_index: usize,
    /// Current lap, 1-based
    pub lap: u32,
    /// Current phase of the run
    pub phase: WorkoutPhase,
    /// Seconds left in the current work or rest interval
    pub remaining_seconds: u32,
    /// Seconds left in the pre-roll countdown
    pub countdown_seconds: u32,
    /// Whether the scheduler is driving this session
    pub is_running: bool,
}

impl WorkoutSession {
    /// Creates a fresh session for a program: phase `Idle`, lap 1, first
    /// exercise selected, remaining time pre-loaded with its work duration.
    pub fn new(program: Arc<Program>) -> Self {
        let exercises = program.sorted_exercises();
        let remaining_seconds = exercises.first().map_or(0, |e| e.work_seconds);
        Self {
            id: Uuid::new_v4(),
            program,
            exercises,
            exercise_index: 0,
            lap: 1,
            phase: WorkoutPhase::Idle,
            remaining_seconds,
            countdown_seconds: COUNTDOWN_SECONDS,
            is_running: false,
        }
    }

    /// Unique identifier of this run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The program this session executes.
    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    /// The sorted exercise sequence this session executes.
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Number of exercises in one lap.
    pub fn total_exercises(&self) -> usize {
        self.exercises.len()
    }

    /// The exercise currently selected, or `None` when the index is out
    /// of range (empty program, or run finished past the last exercise).
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.exercises.get(self.exercise_index)
    }

    /// Fraction of the current interval already elapsed, in `[0, 1]`.
    ///
    /// 0 during the countdown; 1 when there is no current exercise or the
    /// interval has zero length.
    pub fn progress(&self) -> f64 {
        if self.phase == WorkoutPhase::Countdown {
            return 0.0;
        }
        let Some(exercise) = self.current_exercise() else {
            return 1.0;
        };
        let total = if self.phase == WorkoutPhase::Resting {
            exercise.rest_seconds
        } else {
            exercise.work_seconds
        };
        if total == 0 {
            return 1.0;
        }
        1.0 - (f64::from(self.remaining_seconds) / f64::from(total))
    }

    /// Display string for the timer: the raw countdown integer during the
    /// pre-roll, otherwise zero-padded `MM:SS`.
    pub fn formatted_time(&self) -> String {
        if self.phase == WorkoutPhase::Countdown {
            return self.countdown_seconds.to_string();
        }
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Lookahead to the exercise that will run next: the one after the
    /// current index, or the first exercise again when another lap
    /// remains, or `None` at the very end of the run.
    pub fn next_exercise(&self) -> Option<&Exercise> {
        let next_index = self.exercise_index + 1;
        if next_index < self.exercises.len() {
            return self.exercises.get(next_index);
        }
        if self.lap < self.program.laps {
            return self.exercises.first();
        }
        None
    }

    /// True once the run has reached the terminal `Finished` phase.
    pub fn is_completed(&self) -> bool {
        self.phase == WorkoutPhase::Finished
    }

    /// Enters the pre-roll countdown.
    pub fn enter_countdown(&mut self) {
        self.phase = WorkoutPhase::Countdown;
        self.countdown_seconds = COUNTDOWN_SECONDS;
    }

    /// Enters the work phase of the exercise at `index`.
    ///
    /// Returns false without mutating anything if `index` is out of range.
    pub fn enter_work(&mut self, index: usize) -> bool {
        let Some(work_seconds) = self.exercises.get(index).map(|e| e.work_seconds) else {
            return false;
        };
        self.exercise_index = index;
        self.phase = WorkoutPhase::Working;
        self.remaining_seconds = work_seconds;
        true
    }

    /// Enters the rest phase with the given duration.
    pub fn enter_rest(&mut self, rest_seconds: u32) {
        self.phase = WorkoutPhase::Resting;
        self.remaining_seconds = rest_seconds;
    }

    /// Enters the terminal finished phase and stops the session.
    pub fn finish(&mut self) {
        self.phase = WorkoutPhase::Finished;
        self.is_running = false;
    }
}

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Serializable point-in-time view of a session for observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identifier of the run this snapshot was taken from
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    /// Current phase
    pub phase: WorkoutPhase,
    /// Index into the sorted exercise sequence
    #[serde(rename = "exerciseIndex")]
    pub exercise_index: usize,
    /// Current lap, 1-based
    pub lap: u32,
    /// Total laps in the program
    #[serde(rename = "totalLaps")]
    pub total_laps: u32,
    /// Seconds left in the current interval
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Whether the scheduler is running
    #[serde(rename = "isRunning")]
    pub is_running: bool,
    /// Elapsed fraction of the current interval
    pub progress: f64,
    /// Display string for the timer
    #[serde(rename = "formattedTime")]
    pub formatted_time: String,
    /// Name of the current exercise, if any
    #[serde(rename = "currentExercise", skip_serializing_if = "Option::is_none")]
    pub current_exercise: Option<String>,
    /// Name of the upcoming exercise, if any
    #[serde(rename = "nextExercise", skip_serializing_if = "Option::is_none")]
    pub next_exercise: Option<String>,
    /// True once the run has finished
    pub completed: bool,
}

impl SessionSnapshot {
    /// Captures a snapshot of the given session.
    pub fn from_session(session: &WorkoutSession) -> Self {
        Self {
            session_id: session.id(),
            phase: session.phase,
            exercise_index: session.exercise_index,
            lap: session.lap,
            total_laps: session.program().laps,
            remaining_seconds: session.remaining_seconds,
            is_running: session.is_running,
            progress: session.progress(),
            formatted_time: session.formatted_time(),
            current_exercise: session.current_exercise().map(|e| e.name.clone()),
            next_exercise: session.next_exercise().map(|e| e.name.clone()),
            completed: session.is_completed(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
