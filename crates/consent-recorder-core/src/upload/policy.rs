use std::time::Duration;

/// Default time allowed for one upload attempt.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Limits applied by `save()` around each upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Upper bound on one collaborator call.
    pub timeout: Duration,
    /// Artifacts above this size are rejected before upload (`None` = unlimited).
    pub max_size_bytes: Option<u64>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_UPLOAD_TIMEOUT,
            max_size_bytes: None,
        }
    }
}
