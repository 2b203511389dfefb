mod collaborator;
mod policy;

pub use {
    collaborator::{UploadCollaborator, UploadError, UploadReceipt},
    policy::{DEFAULT_UPLOAD_TIMEOUT, UploadPolicy},
};
