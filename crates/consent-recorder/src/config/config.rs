//! Configuration management for consent-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, a command-line override, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, RecordingConfig, UploadConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::config::{DEFAULT_MAX_SIZE_MB, DEFAULT_UPLOAD_TIMEOUT_SECS};
use consent_recorder_core::{
    DEFAULT_STOP_GRACE, EncodingFormat, RecorderOptions, UploadPolicy, default_format_preferences,
};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECONDS_PER_MINUTE: u64 = 60;

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Initial capture constraints.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Encoder and duration settings.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Upload destination and limits.
    pub upload: UploadConfig,
}

impl Config {
    /// Load configuration from `path`, or from the platform config directory
    /// when no override is given. Missing files are created with defaults.
    #[track_caller]
    #[instrument]
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            // Surface bad format strings now rather than on the first start().
            config.format_preferences()?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Self::create_default()?;
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Format preference list, parsed from the override when present.
    #[track_caller]
    pub fn format_preferences(&self) -> AppResult<Vec<EncodingFormat>> {
        match &self.recording.formats {
            None => Ok(default_format_preferences()),
            Some(formats) if formats.is_empty() => Err(AppError::ConfigError {
                reason: "recording.formats must list at least one format".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Some(formats) => formats
                .iter()
                .map(|raw| {
                    raw.parse::<EncodingFormat>()
                        .map_err(|e| AppError::ConfigError {
                            reason: format!("Invalid recording format '{}': {}", raw, e),
                            location: ErrorLocation::from(Location::caller()),
                        })
                })
                .collect(),
        }
    }

    /// Controller settings derived from this configuration.
    #[track_caller]
    pub fn recorder_options(&self) -> AppResult<RecorderOptions> {
        if self.recording.timeslice_ms == 0 {
            return Err(AppError::ConfigError {
                reason: "recording.timeslice_ms must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let recommended_max_seconds = self
            .recording
            .recommended_max_minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .ok_or_else(|| AppError::ConfigError {
                reason: format!(
                    "recording.recommended_max_minutes is too large: {}",
                    self.recording.recommended_max_minutes
                ),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let max_size_bytes = match self.upload.max_size_mb {
            None => None,
            Some(mb) => Some(mb.checked_mul(BYTES_PER_MB).ok_or_else(|| {
                AppError::ConfigError {
                    reason: format!("upload.max_size_mb is too large: {}", mb),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?),
        };

        Ok(RecorderOptions {
            constraints: self.capture.constraints(),
            formats: self.format_preferences()?,
            timeslice: Duration::from_millis(self.recording.timeslice_ms),
            recommended_max_seconds,
            stop_grace: DEFAULT_STOP_GRACE,
            upload: UploadPolicy {
                timeout: Duration::from_secs(self.upload.timeout_secs),
                max_size_bytes,
            },
        })
    }

    /// Configuration with every default applied and uploads under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Config {
            capture: CaptureConfig::default(),
            recording: RecordingConfig::default(),
            upload: UploadConfig {
                output_dir: data_dir.join("uploads"),
                timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
                max_size_mb: Some(DEFAULT_MAX_SIZE_MB),
            },
        }
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "consent-recorder", "Consent-Recorder").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        Ok(Self::with_data_dir(proj_dirs.data_dir()))
    }
}
