//! Synchronous core of the execution engine.
//!
//! [`EngineCore`] holds the session, the feedback sink and the event
//! sender, and implements the tick algorithm, the phase transitions, the
//! shared advance routine and the finish routine. It has no notion of
//! time; [`WorkoutEngine`](super::WorkoutEngine) drives it once per
//! elapsed second and serializes access behind a mutex.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::feedback::{FeedbackCue, FeedbackSink};
use crate::program::Program;
use crate::session::{WorkoutPhase, WorkoutSession};

use super::WorkoutEvent;

/// A decrement landing in this range emits the final-countdown warning.
/// Entering a phase whose initial duration is already inside the range
/// does not; only decrements trigger it.
const WARNING_WINDOW: std::ops::RangeInclusive<u32> = 1..=3;

pub(crate) struct EngineCore {
    pub(crate) session: WorkoutSession,
    /// Bumped by every control action; a ticker task captured with an
    /// older generation stops itself instead of mutating the session.
    pub(crate) generation: u64,
    feedback: Arc<dyn FeedbackSink>,
    event_tx: mpsc::UnboundedSender<WorkoutEvent>,
}

impl EngineCore {
    pub(crate) fn new(
        program: Arc<Program>,
        feedback: Arc<dyn FeedbackSink>,
        event_tx: mpsc::UnboundedSender<WorkoutEvent>,
    ) -> Self {
        Self {
            session: WorkoutSession::new(program),
            generation: 0,
            feedback,
            event_tx,
        }
    }

    // ------------------------------------------------------------------------
    // Control actions
    // ------------------------------------------------------------------------

    /// Applies start semantics to the session.
    ///
    /// Returns true if a ticker should be (re)started. A program with no
    /// exercises and a finished run are both silent no-ops.
    pub(crate) fn begin(&mut self) -> bool {
        if self.session.total_exercises() == 0 {
            tracing::debug!("start ignored: program has no exercises");
            return false;
        }
        if self.session.phase == WorkoutPhase::Finished {
            tracing::debug!("start ignored: workout already finished");
            return false;
        }

        let fresh = self.session.phase == WorkoutPhase::Idle;
        if fresh {
            self.session.enter_countdown();
        }
        self.session.is_running = true;
        self.cue(FeedbackCue::Medium);
        if fresh {
            tracing::info!(session_id = %self.session.id(), "workout started");
            self.emit(WorkoutEvent::Started {
                session_id: self.session.id(),
            });
        } else {
            self.emit(WorkoutEvent::Resumed);
        }
        true
    }

    /// Applies pause semantics: stops the session without touching any
    /// counters, so a later start resumes from the same remaining time.
    pub(crate) fn halt(&mut self) {
        self.session.is_running = false;
        self.cue(FeedbackCue::Light);
        self.emit(WorkoutEvent::Paused);
    }

    /// Discards the session and installs a fresh one for the same program.
    pub(crate) fn reset(&mut self) {
        let program = Arc::clone(self.session.program());
        self.session = WorkoutSession::new(program);
        self.cue(FeedbackCue::Heavy);
        self.emit(WorkoutEvent::Stopped);
    }

    /// Manual skip: forces the shared advance routine regardless of the
    /// remaining time.
    pub(crate) fn skip_to_next(&mut self) {
        self.advance();
        self.cue(FeedbackCue::Medium);
    }

    // ------------------------------------------------------------------------
    // Tick algorithm
    // ------------------------------------------------------------------------

    /// Processes one elapsed second.
    pub(crate) fn tick(&mut self) {
        // The ticker is cancelled on pause; a straggler tick is ignored.
        if !self.session.is_running {
            return;
        }

        if self.session.phase == WorkoutPhase::Countdown {
            if self.session.countdown_seconds > 1 {
                self.session.countdown_seconds -= 1;
                self.cue(FeedbackCue::Light);
                self.emit(WorkoutEvent::CountdownTick {
                    seconds_left: self.session.countdown_seconds,
                });
            } else {
                let index = self.session.exercise_index;
                if !self.session.enter_work(index) {
                    // No exercise at the current index; fall back to a
                    // zero-length work phase the next tick resolves.
                    self.session.phase = WorkoutPhase::Working;
                    self.session.remaining_seconds = 0;
                }
                self.cue(FeedbackCue::Medium);
                self.emit_work_started();
            }
            return;
        }

        if self.session.remaining_seconds > 0 {
            self.session.remaining_seconds -= 1;
            if WARNING_WINDOW.contains(&self.session.remaining_seconds) {
                self.cue(FeedbackCue::Light);
            }
            self.emit(WorkoutEvent::Tick {
                remaining_seconds: self.session.remaining_seconds,
            });
        } else {
            self.transition();
        }
    }

    /// Phase transition taken when the current interval has run out.
    fn transition(&mut self) {
        let Some(exercise) = self.session.current_exercise().cloned() else {
            self.finish();
            return;
        };

        match self.session.phase {
            WorkoutPhase::Working => {
                if exercise.rest_seconds > 0 {
                    self.session.enter_rest(exercise.rest_seconds);
                    self.cue(FeedbackCue::Success);
                    self.emit(WorkoutEvent::RestStarted {
                        exercise: exercise.name,
                        exercise_index: self.session.exercise_index,
                        lap: self.session.lap,
                    });
                } else {
                    // Zero rest: go straight to the next exercise.
                    self.advance();
                }
            }
            WorkoutPhase::Resting => self.advance(),
            // Countdown is handled in tick(); Idle and Finished never
            // reach here while running.
            WorkoutPhase::Countdown | WorkoutPhase::Idle | WorkoutPhase::Finished => {}
        }
    }

    /// Advance-to-next-exercise routine, shared by natural completion and
    /// manual skip: next index, else next lap from the top, else finish.
    fn advance(&mut self) {
        if self.session.total_exercises() == 0 {
            self.finish();
            return;
        }

        let next_index = self.session.exercise_index + 1;
        if self.session.enter_work(next_index) {
            self.cue(FeedbackCue::Success);
            self.emit_work_started();
            return;
        }

        let next_lap = self.session.lap + 1;
        if next_lap <= self.session.program().laps {
            self.session.lap = next_lap;
            self.session.enter_work(0);
            tracing::debug!(lap = next_lap, "lap rollover");
            self.cue(FeedbackCue::Success);
            self.emit_work_started();
        } else {
            self.finish();
        }
    }

    /// Terminal transition: the session stops itself, which also makes
    /// the ticker task exit on its next wakeup.
    fn finish(&mut self) {
        self.session.finish();
        tracing::info!(session_id = %self.session.id(), "workout finished");
        self.cue(FeedbackCue::Success);
        self.emit(WorkoutEvent::Finished {
            laps: self.session.lap,
        });
    }

    // ------------------------------------------------------------------------
    // Side channels
    // ------------------------------------------------------------------------

    /// Fire-and-forget cue delivery; failures never reach timer logic.
    fn cue(&self, cue: FeedbackCue) {
        if let Err(e) = self.feedback.cue(cue) {
            tracing::debug!(cue = cue.as_str(), error = %e, "feedback cue dropped");
        }
    }

    fn emit(&self, event: WorkoutEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("workout event receiver dropped");
        }
    }

    fn emit_work_started(&self) {
        if let Some(exercise) = self.session.current_exercise() {
            self.emit(WorkoutEvent::WorkStarted {
                exercise: exercise.name.clone(),
                exercise_index: self.session.exercise_index,
                lap: self.session.lap,
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
