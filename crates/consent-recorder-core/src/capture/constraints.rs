use serde::{Deserialize, Serialize};

/// Default requested frame width.
pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;
/// Default requested frame height.
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

/// Requested device configuration for one preview/recording session.
///
/// Immutable once handed to a device provider. Toggles on the controller
/// edit its own copy, which is only read by the next preview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    /// Request a camera track.
    pub video_enabled: bool,
    /// Request a microphone track.
    pub audio_enabled: bool,
    /// Requested frame width in pixels.
    pub video_width: u32,
    /// Requested frame height in pixels.
    pub video_height: u32,
}

impl CaptureConstraints {
    /// Returns `true` when neither a camera nor a microphone is requested.
    pub fn is_empty(&self) -> bool {
        !self.video_enabled && !self.audio_enabled
    }
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video_enabled: true,
            audio_enabled: true,
            video_width: DEFAULT_VIDEO_WIDTH,
            video_height: DEFAULT_VIDEO_HEIGHT,
        }
    }
}
