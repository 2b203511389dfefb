use crate::{
    capture::CaptureConstraints,
    encoding::{EncodingFormat, default_format_preferences},
    upload::UploadPolicy,
};

use std::time::Duration;

/// Encoder fragment interval.
pub const DEFAULT_TIMESLICE: Duration = Duration::from_secs(1);

/// Recordings longer than this are flagged in the snapshot.
pub const DEFAULT_RECOMMENDED_MAX_SECONDS: u64 = 5 * 60;

/// How long `stop()` waits for the encoder's final fragment.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Construction-time settings for a [`RecordingController`](crate::RecordingController).
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    /// Constraints used by the first preview request.
    pub constraints: CaptureConstraints,
    /// Candidate formats, most preferred first.
    pub formats: Vec<EncodingFormat>,
    /// Interval at which the encoder delivers fragments.
    pub timeslice: Duration,
    /// Soft limit on recording length, in seconds.
    pub recommended_max_seconds: u64,
    /// Upper bound on waiting for the encoder to flush on stop.
    pub stop_grace: Duration,
    /// Timeout and size limit for uploads.
    pub upload: UploadPolicy,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            constraints: CaptureConstraints::default(),
            formats: default_format_preferences(),
            timeslice: DEFAULT_TIMESLICE,
            recommended_max_seconds: DEFAULT_RECOMMENDED_MAX_SECONDS,
            stop_grace: DEFAULT_STOP_GRACE,
            upload: UploadPolicy::default(),
        }
    }
}
