//! Consent Recorder Core Library
//!
//! Camera/microphone recording workflow for procedure explanation videos:
//! device acquisition, format negotiation, chunk collection, review and
//! upload, behind collaborator traits so any capture stack can plug in.
//!
//! # Example
//!
//! ```no_run
//! use consent_recorder_core::{
//!     CoreResult, EncoderBackend, MediaDeviceProvider, RecorderOptions, RecordingController,
//!     UploadCollaborator,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn record(
//!     devices: Arc<dyn MediaDeviceProvider>,
//!     encoders: Arc<dyn EncoderBackend>,
//!     uploader: Arc<dyn UploadCollaborator>,
//! ) -> CoreResult<()> {
//!     let mut recorder =
//!         RecordingController::new(devices, encoders, uploader, RecorderOptions::default());
//!
//!     recorder.request_preview().await?;
//!     recorder.start().await?;
//!     for _ in 0..3 {
//!         recorder.pump();
//!         recorder.tick();
//!     }
//!     recorder.stop().await?;
//!     recorder.save("procedure-42").await?;
//!     Ok(())
//! }
//! ```

mod capture;
mod controller;
mod encoding;
mod error;
mod session;
mod upload;

pub use {
    capture::{
        CaptureConstraints, DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH, DeviceError, DeviceHandle,
        MediaDeviceProvider, MediaStream, Track, TrackKind,
    },
    controller::{
        ArtifactSummary, ConstraintChange, DEFAULT_RECOMMENDED_MAX_SECONDS, DEFAULT_STOP_GRACE,
        DEFAULT_TIMESLICE, RecorderOptions, RecorderSnapshot, RecordingController,
    },
    encoding::{
        Encoder, EncoderBackend, EncoderError, EncoderEvent, EncoderSink, EncodingFormat,
        FormatParseError, default_format_preferences, negotiate_format,
    },
    error::{Action, FailureKind, RecorderError, Result as CoreResult},
    session::{
        CaptureSession, ElapsedTimer, RecordedArtifact, RecordingState, format_elapsed,
    },
    upload::{DEFAULT_UPLOAD_TIMEOUT, UploadCollaborator, UploadError, UploadPolicy, UploadReceipt},
};
