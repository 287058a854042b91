//! Feedback sink error types.

use thiserror::Error;

/// Errors that can occur when delivering a feedback cue.
///
/// The engine never propagates these; they exist so sink implementations
/// can report failures for logging and diagnostics.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The underlying haptics/audio device is unavailable.
    #[error("feedback device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Cue delivery failed.
    #[error("feedback delivery failed: {0}")]
    DeliveryFailed(String),
}

impl FeedbackError {
    /// Returns true if this error indicates the device is gone, as
    /// opposed to a one-off delivery failure.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceUnavailable(_))
    }
}
