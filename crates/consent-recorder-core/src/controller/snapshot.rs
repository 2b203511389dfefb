use crate::{
    capture::CaptureConstraints,
    error::FailureKind,
    session::{RecordedArtifact, RecordingState},
};

use serde::Serialize;

/// Summary of the pending artifact, for UI binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    /// Payload size.
    pub size_bytes: u64,
    /// Container MIME type.
    pub mime_type: String,
    /// Counted recording time.
    pub duration_seconds: u64,
}

impl From<&RecordedArtifact> for ArtifactSummary {
    fn from(artifact: &RecordedArtifact) -> Self {
        Self {
            size_bytes: artifact.size_bytes(),
            mime_type: artifact.mime_type().to_string(),
            duration_seconds: artifact.duration_seconds(),
        }
    }
}

/// Observable controller state, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecorderSnapshot {
    /// Current state.
    pub state: RecordingState,
    /// Seconds counted in the current session.
    pub elapsed_seconds: u64,
    /// Constraints the next preview will request.
    pub constraints: CaptureConstraints,
    /// Pending artifact, present only while reviewing or uploading.
    pub artifact: Option<ArtifactSummary>,
    /// Kind of the most recent failure, cleared by the next success.
    pub last_failure: Option<FailureKind>,
    /// Elapsed time passed the recommended maximum.
    pub exceeds_recommended_duration: bool,
}
