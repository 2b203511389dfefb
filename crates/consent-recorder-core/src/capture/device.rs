use crate::capture::CaptureConstraints;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Kind of media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Camera frames.
    Video,
    /// Microphone samples.
    Audio,
}

/// Description of one live track in a [`MediaStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Track kind.
    pub kind: TrackKind,
    /// Human-readable device label.
    pub label: String,
}

/// A live camera/microphone stream supplied by a [`MediaDeviceProvider`].
pub trait MediaStream: Send {
    /// Tracks currently carried by the stream.
    fn tracks(&self) -> Vec<Track>;

    /// Stop every track. Called at most once per stream by [`DeviceHandle`].
    fn stop_tracks(&mut self);
}

/// Failure reported by a device provider while acquiring a stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The user or platform refused access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// No matching device, or it is in use elsewhere.
    #[error("device unavailable: {0}")]
    Unavailable(String),
}

/// Supplies audio/video streams for given constraints.
#[async_trait]
pub trait MediaDeviceProvider: Send + Sync {
    /// Acquire a stream matching `constraints`.
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError>;
}

/// Exclusive owner of an acquired [`MediaStream`].
///
/// Releasing stops every track exactly once; later calls are no-ops.
/// Dropping an unreleased handle releases it.
pub struct DeviceHandle {
    id: Uuid,
    stream: Box<dyn MediaStream>,
    released: bool,
}

impl DeviceHandle {
    pub(crate) fn new(stream: Box<dyn MediaStream>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream,
            released: false,
        }
    }

    /// Identifier used for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tracks carried by the underlying stream.
    pub fn tracks(&self) -> Vec<Track> {
        self.stream.tracks()
    }

    /// Whether [`release`](Self::release) has already run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Stop all tracks. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.stream.stop_tracks();
        debug!(handle_id = %self.id, "Device handle released");
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
