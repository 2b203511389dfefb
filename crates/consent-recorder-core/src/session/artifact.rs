use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The assembled video produced by one capture session.
///
/// Cloning is cheap: the payload is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedArtifact {
    session_id: Uuid,
    data: Bytes,
    mime_type: String,
    file_extension: String,
    duration_seconds: u64,
    recorded_at: DateTime<Utc>,
}

impl RecordedArtifact {
    pub(crate) fn new(
        session_id: Uuid,
        data: Bytes,
        mime_type: String,
        file_extension: String,
        duration_seconds: u64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            data,
            mime_type,
            file_extension,
            duration_seconds,
            recorded_at,
        }
    }

    /// Session that produced the artifact.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Concatenated encoder fragments.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Container MIME type without codec parameters.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Conventional file extension for the container.
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Payload size.
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Counted recording time, excluding pauses.
    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// When recording started.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
