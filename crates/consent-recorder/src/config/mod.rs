mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;
mod upload_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, recording_config::RecordingConfig,
    upload_config::UploadConfig,
};

use consent_recorder_core::{DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH};

pub(crate) const DEFAULT_TIMESLICE_MS: u64 = 1000;
pub(crate) const DEFAULT_RECOMMENDED_MAX_MINUTES: u64 = 5;
pub(crate) const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_MAX_SIZE_MB: u64 = 100;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_video_width() -> u32 {
    DEFAULT_VIDEO_WIDTH
}

pub(crate) fn default_video_height() -> u32 {
    DEFAULT_VIDEO_HEIGHT
}

pub(crate) fn default_timeslice_ms() -> u64 {
    DEFAULT_TIMESLICE_MS
}

pub(crate) fn default_recommended_max_minutes() -> u64 {
    DEFAULT_RECOMMENDED_MAX_MINUTES
}

pub(crate) fn default_upload_timeout_secs() -> u64 {
    DEFAULT_UPLOAD_TIMEOUT_SECS
}

pub(crate) fn default_max_size_mb() -> Option<u64> {
    Some(DEFAULT_MAX_SIZE_MB)
}
