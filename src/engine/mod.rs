//! Execution controller for the workout engine.
//!
//! This module drives a [`WorkoutSession`] through its phases:
//! - Manual controls: start, pause, toggle, manual skip, stop/reset
//! - A 1-second scheduler built on `tokio::time::interval`
//! - Event firing for observers after every mutation
//! - Feedback cues routed to an abstract sink
//!
//! The synchronous state machine lives in [`core::EngineCore`]; this file
//! owns the ticker task and the cancellation bookkeeping around it.

mod core;

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use uuid::Uuid;

use crate::feedback::{FeedbackSink, NoopFeedback};
use crate::program::Program;
use crate::session::{SessionSnapshot, WorkoutSession};

use self::core::EngineCore;

// ============================================================================
// WorkoutEvent
// ============================================================================

/// Engine events for observers (presentation layers, logs, tests).
///
/// One event is emitted after every session mutation; pull-based
/// observers can use [`WorkoutEngine::snapshot`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutEvent {
    /// A fresh run entered its pre-roll countdown
    Started {
        /// Identifier of the new run
        session_id: Uuid,
    },
    /// A paused run continued from its remaining time
    Resumed,
    /// The pre-roll countdown decremented
    CountdownTick {
        /// Countdown seconds left
        seconds_left: u32,
    },
    /// A work interval began
    WorkStarted {
        /// Exercise name
        exercise: String,
        /// Index into the sorted exercise sequence
        exercise_index: usize,
        /// Current lap, 1-based
        lap: u32,
    },
    /// A rest interval began
    RestStarted {
        /// Exercise name
        exercise: String,
        /// Index into the sorted exercise sequence
        exercise_index: usize,
        /// Current lap, 1-based
        lap: u32,
    },
    /// One second elapsed within a work or rest interval
    Tick {
        /// Remaining seconds in the interval
        remaining_seconds: u32,
    },
    /// The run was paused
    Paused,
    /// The run was stopped and a fresh session installed
    Stopped,
    /// The run reached its terminal phase
    Finished {
        /// Lap the run ended on
        laps: u32,
    },
}

// ============================================================================
// WorkoutEngine
// ============================================================================

/// Execution controller: owns the session, drives the 1-second scheduler
/// and applies the phase transition algorithm.
///
/// All session mutation happens behind one mutex, so observers never see
/// a transiently-invalid phase/index/remaining combination. Every control
/// action bumps a generation counter before touching the ticker; a ticker
/// task that wakes up with a stale generation exits without mutating
/// anything, so a cancelled scheduler can never reach a discarded session.
pub struct WorkoutEngine {
    core: Arc<Mutex<EngineCore>>,
    timer: Option<JoinHandle<()>>,
}

impl WorkoutEngine {
    /// Creates an engine for a program with no feedback (headless).
    pub fn new(program: Arc<Program>, event_tx: mpsc::UnboundedSender<WorkoutEvent>) -> Self {
        Self::with_feedback(program, Arc::new(NoopFeedback::new()), event_tx)
    }

    /// Creates an engine that routes cues to the given feedback sink.
    pub fn with_feedback(
        program: Arc<Program>,
        feedback: Arc<dyn FeedbackSink>,
        event_tx: mpsc::UnboundedSender<WorkoutEvent>,
    ) -> Self {
        Self {
            core: Arc::new(Mutex::new(EngineCore::new(program, feedback, event_tx))),
            timer: None,
        }
    }

    /// Starts or resumes the run and the 1-second scheduler.
    ///
    /// A program with no exercises is a silent no-op. From `Idle` this
    /// enters the pre-roll countdown; from a paused mid-run state it
    /// continues with the same remaining time. Any prior ticker is
    /// invalidated before the new one is installed.
    pub async fn start(&mut self) {
        let generation = {
            let mut core = self.core.lock().await;
            if !core.begin() {
                return;
            }
            core.generation += 1;
            core.generation
        };
        self.spawn_ticker(generation);
    }

    /// Pauses the run and cancels the scheduler. Counters are untouched;
    /// a later [`start`](Self::start) resumes from the same remaining
    /// time. Idempotent.
    pub async fn pause(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
        let mut core = self.core.lock().await;
        core.generation += 1;
        core.halt();
    }

    /// Pauses when running, starts otherwise.
    pub async fn toggle_play_pause(&mut self) {
        let running = { self.core.lock().await.session.is_running };
        if running {
            self.pause().await;
        } else {
            self.start().await;
        }
    }

    /// Manual skip: advances to the next exercise immediately through the
    /// same routine natural completion uses, regardless of remaining time.
    pub async fn next_exercise(&mut self) {
        let mut core = self.core.lock().await;
        core.skip_to_next();
    }

    /// Stops the run: cancels the scheduler, discards the session and
    /// installs a fresh one for the same program (`Idle`, lap 1, first
    /// exercise). The old ticker can never reach the new session.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
        let mut core = self.core.lock().await;
        core.generation += 1;
        core.reset();
    }

    /// Alias for [`stop`](Self::stop).
    pub async fn reset(&mut self) {
        self.stop().await;
    }

    /// Returns a clone of the current session state.
    pub async fn session(&self) -> WorkoutSession {
        self.core.lock().await.session.clone()
    }

    /// Returns a serializable snapshot of the current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(&self.core.lock().await.session)
    }

    /// Spawns the ticker task for the given generation, invalidating any
    /// prior one so two schedulers never run concurrently.
    fn spawn_ticker(&mut self, generation: u64) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }

        let core = Arc::clone(&self.core);
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it
            // so the first real tick lands one second after start.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let mut core = core.lock().await;
                if core.generation != generation || !core.session.is_running {
                    break;
                }
                core.tick();
            }
        }));
    }
}

impl Drop for WorkoutEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
