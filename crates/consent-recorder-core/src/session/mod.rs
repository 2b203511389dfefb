mod artifact;
mod capture_session;
mod state;
mod timer;

pub use {
    artifact::RecordedArtifact,
    capture_session::CaptureSession,
    state::RecordingState,
    timer::{ElapsedTimer, format_elapsed},
};
