use async_trait::async_trait;
use consent_recorder_core::{
    CaptureConstraints, DeviceError, MediaDeviceProvider, MediaStream, Track, TrackKind,
};
use tracing::{debug, info, instrument};

/// Stream backed by no real hardware; records only whether it was stopped.
pub struct SimulatedStream {
    tracks: Vec<Track>,
    stopped: bool,
}

impl MediaStream for SimulatedStream {
    fn tracks(&self) -> Vec<Track> {
        if self.stopped {
            Vec::new()
        } else {
            self.tracks.clone()
        }
    }

    fn stop_tracks(&mut self) {
        self.stopped = true;
        debug!(track_count = self.tracks.len(), "Simulated tracks stopped");
    }
}

/// Device provider that always grants access to a test-pattern camera and a silent microphone.
#[derive(Debug, Default)]
pub struct SimulatedDeviceProvider;

#[async_trait]
impl MediaDeviceProvider for SimulatedDeviceProvider {
    #[instrument(skip(self))]
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        let mut tracks = Vec::with_capacity(2);

        if constraints.video_enabled {
            tracks.push(Track {
                kind: TrackKind::Video,
                label: format!(
                    "Simulated camera ({}x{})",
                    constraints.video_width, constraints.video_height
                ),
            });
        }
        if constraints.audio_enabled {
            tracks.push(Track {
                kind: TrackKind::Audio,
                label: "Simulated microphone".to_string(),
            });
        }

        if tracks.is_empty() {
            return Err(DeviceError::Unavailable("no tracks requested".to_string()));
        }

        info!(track_count = tracks.len(), "Simulated devices acquired");

        Ok(Box::new(SimulatedStream {
            tracks,
            stopped: false,
        }))
    }
}
