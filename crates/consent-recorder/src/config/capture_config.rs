use crate::config::{default_true, default_video_height, default_video_width};

use consent_recorder_core::CaptureConstraints;
use serde::{Deserialize, Serialize};

/// Camera/microphone defaults for the first preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Request a camera track.
    #[serde(default = "default_true")]
    pub video_enabled: bool,
    /// Request a microphone track.
    #[serde(default = "default_true")]
    pub audio_enabled: bool,
    /// Requested frame width.
    #[serde(default = "default_video_width")]
    pub video_width: u32,
    /// Requested frame height.
    #[serde(default = "default_video_height")]
    pub video_height: u32,
}

impl CaptureConfig {
    /// Constraints for the recorder's first preview.
    pub fn constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            video_enabled: self.video_enabled,
            audio_enabled: self.audio_enabled,
            video_width: self.video_width,
            video_height: self.video_height,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            video_enabled: true,
            audio_enabled: true,
            video_width: default_video_width(),
            video_height: default_video_height(),
        }
    }
}
