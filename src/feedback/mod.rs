//! Feedback sink abstraction for haptic/audio cues.
//!
//! The engine announces phase transitions through a [`FeedbackSink`]. The
//! sink is side-effect-only: the engine never consults a return value for
//! control flow and swallows every failure, so a broken or absent haptics
//! layer can never affect timer correctness.
//!
//! Implementations are platform glue (haptics, audio) supplied by the
//! embedding application; [`NoopFeedback`] serves headless environments
//! and [`MockFeedbackSink`] records cues for tests.

mod error;

pub use error::FeedbackError;

use serde::{Deserialize, Serialize};

// ============================================================================
// FeedbackCue
// ============================================================================

/// Intensity/kind of a feedback cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCue {
    /// Subtle cue: countdown ticks, final-seconds warning, pause
    Light,
    /// Standard cue: start, work phase entry, manual skip
    Medium,
    /// Strong cue: stop/reset
    Heavy,
    /// Completion cue: rest entry, exercise advance, workout finished
    Success,
}

impl FeedbackCue {
    /// Returns the string representation of the cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCue::Light => "light",
            FeedbackCue::Medium => "medium",
            FeedbackCue::Heavy => "heavy",
            FeedbackCue::Success => "success",
        }
    }
}

// ============================================================================
// FeedbackSink
// ============================================================================

/// Trait for feedback cue delivery implementations.
///
/// Delivery must not block: the engine calls [`FeedbackSink::cue`] from
/// its tick path and treats it as fire-and-forget.
pub trait FeedbackSink: Send + Sync {
    /// Delivers a cue.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the engine logs and ignores it.
    fn cue(&self, cue: FeedbackCue) -> Result<(), FeedbackError>;

    /// Returns true if cue delivery is currently enabled.
    fn is_enabled(&self) -> bool;

    /// Enables cue delivery.
    fn enable(&self);

    /// Disables cue delivery. Disabled sinks accept cues and drop them.
    fn disable(&self);
}

// ============================================================================
// NoopFeedback
// ============================================================================

/// Feedback sink that discards every cue.
///
/// Used for headless runs and as the default when the embedder supplies
/// no platform sink.
#[derive(Debug, Default)]
pub struct NoopFeedback;

impl NoopFeedback {
    pub fn new() -> Self {
        Self
    }
}

impl FeedbackSink for NoopFeedback {
    fn cue(&self, _cue: FeedbackCue) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn enable(&self) {}

    fn disable(&self) {}
}

// ============================================================================
// MockFeedbackSink
// ============================================================================

/// Mock feedback sink for testing.
#[derive(Debug, Default)]
pub struct MockFeedbackSink {
    cues: std::sync::Mutex<Vec<FeedbackCue>>,
    enabled: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockFeedbackSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cues: std::sync::Mutex::new(Vec::new()),
            enabled: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `cue` call fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of cues recorded so far.
    #[must_use]
    pub fn cue_count(&self) -> usize {
        self.cues.lock().unwrap().len()
    }

    /// All cues recorded so far, in delivery order.
    #[must_use]
    pub fn recorded_cues(&self) -> Vec<FeedbackCue> {
        self.cues.lock().unwrap().clone()
    }

    /// Clears the recorded cues.
    pub fn clear(&self) {
        self.cues.lock().unwrap().clear();
    }
}

impl FeedbackSink for MockFeedbackSink {
    fn cue(&self, cue: FeedbackCue) -> Result<(), FeedbackError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(FeedbackError::DeliveryFailed("mock failure".to_string()));
        }
        if !self.enabled.load(std::sync::atomic::Ordering::SeqCst) {
            return Ok(());
        }
        self.cues.lock().unwrap().push(cue);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn enable(&self) {
        self.enabled
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    fn disable(&self) {
        self.enabled
            .store(false, std::sync::atomic::Ordering::SeqCst);
    }
}

// ============================================================================
// Tests
// ============================================================================
