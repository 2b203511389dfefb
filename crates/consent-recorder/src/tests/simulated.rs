use crate::simulated::{
    FRAGMENT_BYTES, STREAM_MAGIC, SimulatedDeviceProvider, SimulatedEncoderBackend,
    synthetic_fragment,
};

use consent_recorder_core::{
    CaptureConstraints, DeviceError, EncoderBackend, EncodingFormat, MediaDeviceProvider,
    TrackKind,
};

/// WHAT: Simulated devices expose one track per enabled constraint
/// WHY: Disabled video or audio must not be captured
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_audio_disabled_when_acquiring_then_only_video_track() {
    // Given: Constraints with audio off
    let constraints = CaptureConstraints {
        audio_enabled: false,
        ..CaptureConstraints::default()
    };

    // When: Acquiring
    let mut stream = SimulatedDeviceProvider.acquire(&constraints).await.unwrap();

    // Then: A single video track until stopped
    let tracks = stream.tracks();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].kind, TrackKind::Video);
    assert!(tracks[0].label.contains("1280x720"));

    stream.stop_tracks();
    assert!(stream.tracks().is_empty());
}

/// WHAT: Acquiring with nothing enabled fails
/// WHY: An empty stream cannot be recorded
#[tokio::test]
async fn given_no_tracks_requested_when_acquiring_then_unavailable() {
    // Given: Both constraints off
    let constraints = CaptureConstraints {
        video_enabled: false,
        audio_enabled: false,
        ..CaptureConstraints::default()
    };

    // When: Acquiring
    let result = SimulatedDeviceProvider.acquire(&constraints).await;

    // Then: Unavailable
    assert!(matches!(result, Err(DeviceError::Unavailable(_))));
}

/// WHAT: The default backend lacks vp9
/// WHY: Exercises the fallback path of format negotiation
#[test]
fn given_default_backend_when_probing_then_vp8_supported_and_vp9_not() {
    // Given: Default simulated backend
    let backend = SimulatedEncoderBackend::default();

    // When/Then: vp8+opus supported, vp9+opus not
    assert!(backend.supports_format(&EncodingFormat::new("video/webm", &["vp8", "opus"])));
    assert!(!backend.supports_format(&EncodingFormat::new("video/webm", &["vp9", "opus"])));
    assert!(backend.supports_format(&EncodingFormat::new("video/mp4", &[])));
}

/// WHAT: Fragments are fixed-size and the first carries the stream header
/// WHY: Saved files must be recognisable and deterministic
#[test]
fn given_sequence_numbers_when_building_fragments_then_header_only_first() {
    // Given: A format
    let format = EncodingFormat::new("video/webm", &["vp8", "opus"]);

    // When: Building the first two fragments
    let first = synthetic_fragment(&format, 0);
    let second = synthetic_fragment(&format, 1);

    // Then: Same size, header only on the first, deterministic content
    assert_eq!(first.len(), FRAGMENT_BYTES);
    assert_eq!(second.len(), FRAGMENT_BYTES);
    assert!(first.starts_with(STREAM_MAGIC));
    assert!(!second.starts_with(STREAM_MAGIC));
    assert_eq!(second, synthetic_fragment(&format, 1));
}
