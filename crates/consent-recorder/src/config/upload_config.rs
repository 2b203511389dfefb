use crate::config::{default_max_size_mb, default_upload_timeout_secs};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how finished recordings are uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory that receives uploaded recordings.
    pub output_dir: PathBuf,
    /// Upper bound on one upload attempt, in seconds.
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
    /// Largest accepted recording, in MiB (None = unlimited).
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: Option<u64>,
}
