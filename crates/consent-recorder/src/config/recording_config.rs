use crate::config::{default_recommended_max_minutes, default_timeslice_ms};

use serde::{Deserialize, Serialize};

/// Encoder and duration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Interval between encoder fragments, in milliseconds.
    #[serde(default = "default_timeslice_ms")]
    pub timeslice_ms: u64,
    /// Recordings longer than this are flagged.
    #[serde(default = "default_recommended_max_minutes")]
    pub recommended_max_minutes: u64,
    /// Format preference override as MIME strings (None = built-in list).
    #[serde(default)]
    pub formats: Option<Vec<String>>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            timeslice_ms: default_timeslice_ms(),
            recommended_max_minutes: default_recommended_max_minutes(),
            formats: None,
        }
    }
}
