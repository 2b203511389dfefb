use crate::{encoding::EncodingFormat, session::RecordedArtifact};

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// One recording attempt: negotiated format plus the fragments collected so far.
#[derive(Debug)]
pub struct CaptureSession {
    id: Uuid,
    format: EncodingFormat,
    chunks: Vec<Bytes>,
    frozen: bool,
    started_at: DateTime<Utc>,
}

impl CaptureSession {
    /// Begin a session that records in `format`.
    pub fn new(format: EncodingFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            format,
            chunks: Vec::new(),
            frozen: false,
            started_at: Utc::now(),
        }
    }

    /// Session identifier for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Format negotiated on start.
    pub fn format(&self) -> &EncodingFormat {
        &self.format
    }

    /// Append a fragment in arrival order.
    ///
    /// Empty fragments, and anything after [`freeze`](Self::freeze), are
    /// ignored. Returns whether the fragment was kept.
    pub fn push_chunk(&mut self, chunk: Bytes) -> bool {
        if self.frozen || chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Number of fragments kept.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total bytes kept.
    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    /// Reject further fragments.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Concatenate fragments into an artifact tagged with the container MIME type.
    pub fn assemble(mut self, duration_seconds: u64) -> RecordedArtifact {
        self.freeze();

        let mut data = BytesMut::with_capacity(self.byte_len());
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }

        debug!(
            session_id = %self.id,
            chunk_count = self.chunks.len(),
            size_bytes = data.len(),
            "Artifact assembled"
        );

        RecordedArtifact::new(
            self.id,
            data.freeze(),
            self.format.container_mime().to_string(),
            self.format.file_extension().to_string(),
            duration_seconds,
            self.started_at,
        )
    }
}
