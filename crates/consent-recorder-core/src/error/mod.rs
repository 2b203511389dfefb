use crate::session::RecordingState;

use std::fmt;

use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// Recording controller errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The user or platform refused camera/microphone access.
    #[error("Device permission denied: {reason} {location}")]
    PermissionDenied {
        /// Description reported by the device provider.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No matching camera/microphone, or the device is held elsewhere.
    #[error("Capture device unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Description reported by the device provider.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// None of the candidate encoding formats is supported by the encoder backend.
    #[error("No supported recording format among {candidates} candidates {location}")]
    UnsupportedFormat {
        /// Number of formats that were probed.
        candidates: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder backend failed to create, pause, resume or stop an encoder.
    #[error("Encoder error: {reason} {location}")]
    EncoderFailed {
        /// Description of the encoder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The upload collaborator rejected the artifact.
    #[error("Upload failed: {source} {location}")]
    UploadFailed {
        /// Underlying error from the upload collaborator.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The upload collaborator did not answer within the configured timeout.
    #[error("Upload timed out after {timeout_ms}ms {location}")]
    UploadTimedOut {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u128,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The artifact exceeds the configured upload size limit.
    #[error("Recording is {size_bytes} bytes, limit is {max_bytes} bytes {location}")]
    ArtifactTooLarge {
        /// Size of the assembled artifact.
        size_bytes: u64,
        /// Configured upload limit.
        max_bytes: u64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The requested action is not valid in the current state.
    #[error("Cannot {action} while {from:?} {location}")]
    InvalidTransition {
        /// State the controller was in when the action was requested.
        from: RecordingState,
        /// The rejected action.
        action: Action,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl RecorderError {
    /// Classify the error for UI decisions ("try again" vs. give up).
    pub fn kind(&self) -> FailureKind {
        match self {
            RecorderError::PermissionDenied { .. } => FailureKind::PermissionDenied,
            RecorderError::DeviceUnavailable { .. } => FailureKind::DeviceUnavailable,
            RecorderError::UnsupportedFormat { .. } => FailureKind::UnsupportedFormat,
            RecorderError::EncoderFailed { .. } => FailureKind::Encoder,
            RecorderError::UploadFailed { .. }
            | RecorderError::UploadTimedOut { .. }
            | RecorderError::ArtifactTooLarge { .. } => FailureKind::Upload,
            RecorderError::InvalidTransition { .. } => FailureKind::InvalidTransition,
        }
    }
}

/// Coarse classification of a [`RecorderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Device access refused.
    PermissionDenied,
    /// Device missing or busy.
    DeviceUnavailable,
    /// No encoding format available in this runtime.
    UnsupportedFormat,
    /// Encoder misbehaved mid-session.
    Encoder,
    /// Upload rejected, timed out, or over the size limit. The artifact is kept.
    Upload,
    /// Caller asked for something the current state does not allow.
    InvalidTransition,
}

impl FailureKind {
    /// Whether retrying in the same runtime can succeed.
    pub fn is_recoverable(self) -> bool {
        !matches!(self, FailureKind::UnsupportedFormat)
    }
}

/// Caller-facing actions, used to report rejected transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Acquire the device and show a live preview.
    RequestPreview,
    /// Begin encoding.
    Start,
    /// Suspend encoding and the ticker.
    Pause,
    /// Continue after a pause.
    Resume,
    /// Finish encoding and assemble the artifact.
    Stop,
    /// Drop the reviewed artifact.
    Discard,
    /// Upload the reviewed artifact.
    Save,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::RequestPreview => "request preview",
            Action::Start => "start",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Stop => "stop",
            Action::Discard => "discard",
            Action::Save => "save",
        };
        f.write_str(name)
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
