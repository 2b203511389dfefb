use crate::{AppError, config::Config};

use std::{fs, time::Duration};

use consent_recorder_core::{EncodingFormat, default_format_preferences};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    #[allow(clippy::unwrap_used)]
    fs::write(&path, contents).unwrap();
    path
}

/// WHAT: Omitted sections and keys fall back to defaults
/// WHY: A minimal config only needs the upload directory
#[test]
#[allow(clippy::unwrap_used)]
fn given_minimal_config_when_loading_then_defaults_applied() {
    // Given: A config naming only the upload directory
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[upload]\noutput_dir = \"/tmp/recordings\"\n");

    // When: Loading
    let config = Config::load(Some(&path)).unwrap();

    // Then: Capture, recording and upload defaults filled in
    assert!(config.capture.video_enabled);
    assert!(config.capture.audio_enabled);
    assert_eq!(config.capture.video_width, 1280);
    assert_eq!(config.capture.video_height, 720);
    assert_eq!(config.recording.timeslice_ms, 1000);
    assert_eq!(config.recording.recommended_max_minutes, 5);
    assert!(config.recording.formats.is_none());
    assert_eq!(config.upload.timeout_secs, 30);
    assert_eq!(config.upload.max_size_mb, Some(100));
}

/// WHAT: Saved configuration loads back unchanged
/// WHY: Atomic save must produce a parseable file
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_config_when_loading_then_values_preserved() {
    // Given: A customised config saved into a nested directory
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = Config::with_data_dir(dir.path());
    config.capture.audio_enabled = false;
    config.recording.timeslice_ms = 250;
    config.recording.formats = Some(vec!["video/mp4".to_string()]);

    // When: Saving then loading
    config.save_to(&path).unwrap();
    let loaded = Config::load(Some(&path)).unwrap();

    // Then: Values survive and no temp file is left behind
    assert!(!loaded.capture.audio_enabled);
    assert_eq!(loaded.recording.timeslice_ms, 250);
    assert_eq!(loaded.upload.output_dir, dir.path().join("uploads"));
    assert!(!path.with_extension("toml.tmp").exists());
}

/// WHAT: A malformed format override fails at load time
/// WHY: Bad formats should surface before the first recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_invalid_format_override_when_loading_then_config_error() {
    // Given: A format string without a subtype
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[recording]\nformats = [\"video\"]\n\n[upload]\noutput_dir = \"/tmp/r\"\n",
    );

    // When: Loading
    let result = Config::load(Some(&path));

    // Then: ConfigError
    assert!(matches!(result, Err(AppError::ConfigError { .. })));
}

/// WHAT: An empty format override is rejected
/// WHY: Negotiation needs at least one candidate
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_format_override_when_building_preferences_then_config_error() {
    // Given: An explicit empty list
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_data_dir(dir.path());
    config.recording.formats = Some(Vec::new());

    // When/Then: Rejected
    assert!(matches!(
        config.format_preferences(),
        Err(AppError::ConfigError { .. })
    ));
}

/// WHAT: Configuration converts into controller options
/// WHY: Units (ms, minutes, MiB) must be converted correctly
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_building_recorder_options_then_units_converted() {
    // Given: Custom recording and upload settings
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_data_dir(dir.path());
    config.recording.timeslice_ms = 500;
    config.recording.recommended_max_minutes = 2;
    config.upload.timeout_secs = 10;
    config.upload.max_size_mb = Some(3);
    config.recording.formats = Some(vec![
        "video/webm;codecs=vp8,opus".to_string(),
        "video/mp4".to_string(),
    ]);

    // When: Converting
    let options = config.recorder_options().unwrap();

    // Then: Values carried over in controller units
    assert_eq!(options.timeslice, Duration::from_millis(500));
    assert_eq!(options.recommended_max_seconds, 120);
    assert_eq!(options.upload.timeout, Duration::from_secs(10));
    assert_eq!(options.upload.max_size_bytes, Some(3 * 1024 * 1024));
    assert_eq!(
        options.formats,
        vec![
            EncodingFormat::new("video/webm", &["vp8", "opus"]),
            EncodingFormat::new("video/mp4", &[]),
        ]
    );
}

/// WHAT: Without an override the built-in preference list is used
/// WHY: Most deployments never configure formats
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_format_override_when_building_preferences_then_defaults_used() {
    // Given: Default recording settings
    let dir = TempDir::new().unwrap();
    let config = Config::with_data_dir(dir.path());

    // When/Then: Built-in list
    assert_eq!(
        config.format_preferences().unwrap(),
        default_format_preferences()
    );
}

/// WHAT: A zero timeslice is rejected
/// WHY: The encoder cannot emit fragments every zero milliseconds
#[test]
#[allow(clippy::unwrap_used)]
fn given_zero_timeslice_when_building_recorder_options_then_config_error() {
    // Given: timeslice_ms = 0
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_data_dir(dir.path());
    config.recording.timeslice_ms = 0;

    // When/Then: Rejected
    assert!(matches!(
        config.recorder_options(),
        Err(AppError::ConfigError { .. })
    ));
}

/// WHAT: Size and duration limits that overflow are rejected
/// WHY: Oversized values must not wrap into tiny limits or panic
#[test]
#[allow(clippy::unwrap_used)]
fn given_overflowing_limits_when_building_recorder_options_then_config_error() {
    // Given: A size cap whose byte count exceeds u64
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_data_dir(dir.path());
    config.upload.max_size_mb = Some(u64::MAX / 1024);

    // When/Then: Rejected
    assert!(matches!(
        config.recorder_options(),
        Err(AppError::ConfigError { .. })
    ));

    // And: Same for a recommended duration whose seconds exceed u64
    config.upload.max_size_mb = Some(100);
    config.recording.recommended_max_minutes = u64::MAX / 2;
    assert!(matches!(
        config.recorder_options(),
        Err(AppError::ConfigError { .. })
    ));

    // And: The largest representable limits still convert
    config.recording.recommended_max_minutes = u64::MAX / 60;
    config.upload.max_size_mb = Some(u64::MAX / (1024 * 1024));
    assert!(config.recorder_options().is_ok());
}
