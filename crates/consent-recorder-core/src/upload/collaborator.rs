use crate::session::RecordedArtifact;

use async_trait::async_trait;

/// Error type returned by upload collaborators.
pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// Confirmation returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Where the collaborator stored the artifact (URL, path, object key).
    pub location: String,
}

/// Accepts a finished artifact for a procedure.
#[async_trait]
pub trait UploadCollaborator: Send + Sync {
    /// Store `artifact` and attach it to `procedure_id`.
    async fn upload(
        &self,
        artifact: &RecordedArtifact,
        procedure_id: &str,
    ) -> Result<UploadReceipt, UploadError>;
}
