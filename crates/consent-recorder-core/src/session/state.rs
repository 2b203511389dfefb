use serde::Serialize;

/// Recording controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    /// No device open, no artifact.
    #[default]
    Idle,
    /// Device open, live preview, not encoding.
    Previewing,
    /// Encoding and counting time.
    Recording,
    /// Encoder and ticker suspended, device still open.
    Paused,
    /// Encoder finished, artifact being assembled.
    Stopped,
    /// Artifact ready for review.
    Reviewing,
    /// Artifact handed to the upload collaborator.
    Uploading,
    /// A device or encoder failure ended the session.
    Error,
}

impl RecordingState {
    /// States in which the controller owns an open device handle.
    pub fn holds_device(self) -> bool {
        matches!(
            self,
            RecordingState::Previewing | RecordingState::Recording | RecordingState::Paused
        )
    }

    /// States in which a recorded artifact exists.
    pub fn has_artifact(self) -> bool {
        matches!(self, RecordingState::Reviewing | RecordingState::Uploading)
    }

    /// States with an active encoder.
    pub fn is_capturing(self) -> bool {
        matches!(self, RecordingState::Recording | RecordingState::Paused)
    }
}
