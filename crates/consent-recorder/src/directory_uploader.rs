use std::path::PathBuf;

use async_trait::async_trait;
use consent_recorder_core::{RecordedArtifact, UploadCollaborator, UploadError, UploadReceipt};
use tracing::{info, instrument};

/// Upload collaborator that files recordings into a local directory.
///
/// Each artifact lands at `<procedure_id>-<session_id>.<ext>`, written to a
/// temporary name first and renamed into place.
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    output_dir: PathBuf,
}

impl DirectoryUploader {
    /// Uploader writing under `output_dir`, created on first upload.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

fn validate_procedure_id(procedure_id: &str) -> Result<(), UploadError> {
    if procedure_id.is_empty() {
        return Err("procedure id is empty".into());
    }
    if let Some(bad) = procedure_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("procedure id contains invalid character {:?}", bad).into());
    }
    Ok(())
}

#[async_trait]
impl UploadCollaborator for DirectoryUploader {
    #[instrument(
        skip(self, artifact),
        fields(session_id = %artifact.session_id(), size_bytes = artifact.size_bytes())
    )]
    async fn upload(
        &self,
        artifact: &RecordedArtifact,
        procedure_id: &str,
    ) -> Result<UploadReceipt, UploadError> {
        validate_procedure_id(procedure_id)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let file_name = format!(
            "{}-{}.{}",
            procedure_id,
            artifact.session_id(),
            artifact.file_extension()
        );
        let final_path = self.output_dir.join(&file_name);
        let temp_path = self.output_dir.join(format!("{}.part", file_name));

        tokio::fs::write(&temp_path, artifact.data()).await?;
        tokio::fs::rename(&temp_path, &final_path).await?;

        info!(path = ?final_path, "Recording stored");

        Ok(UploadReceipt {
            location: final_path.display().to_string(),
        })
    }
}
