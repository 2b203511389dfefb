//! Recording session controller.
//!
//! Owns the device handle, the encoder and the capture session, and funnels
//! every mutation through the transition methods below. Encoder callbacks
//! arrive as [`EncoderEvent`]s on a channel and are applied by
//! [`RecordingController::pump`] or while stopping, so the controller can be
//! driven entirely by fakes in tests.

use crate::{
    Action, CoreResult, FailureKind, RecorderError,
    capture::{CaptureConstraints, DeviceError, DeviceHandle, MediaDeviceProvider},
    controller::{ArtifactSummary, RecorderOptions, RecorderSnapshot},
    encoding::{
        Encoder, EncoderBackend, EncoderEvent, EncoderSink, EncodingFormat, negotiate_format,
    },
    session::{CaptureSession, ElapsedTimer, RecordedArtifact, RecordingState},
    upload::{UploadCollaborator, UploadReceipt},
};

use std::{future::Future, mem, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::{
    mpsc::{self, error::TryRecvError},
    watch,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Everything that only exists while an encoder is running.
struct ActiveCapture {
    handle: DeviceHandle,
    encoder: Box<dyn Encoder>,
    events: mpsc::UnboundedReceiver<EncoderEvent>,
    session: CaptureSession,
    paused: bool,
    encoder_finished: bool,
}

impl ActiveCapture {
    /// Apply queued encoder events without waiting. Returns fragments kept.
    fn drain_events(&mut self) -> usize {
        let mut kept = 0;
        loop {
            match self.events.try_recv() {
                Ok(EncoderEvent::Chunk(chunk)) => {
                    if self.session.push_chunk(chunk) {
                        kept += 1;
                    }
                }
                Ok(EncoderEvent::Stopped) => {
                    warn!(session_id = %self.session.id(), "Encoder stopped on its own");
                    self.encoder_finished = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.encoder_finished = true;
                    break;
                }
            }
        }
        kept
    }
}

/// Controller state with the resources each state owns.
enum Phase {
    Idle,
    Previewing {
        handle: DeviceHandle,
        constraints: CaptureConstraints,
    },
    Capturing(ActiveCapture),
    Stopped,
    Reviewing { artifact: RecordedArtifact },
    Uploading { artifact: RecordedArtifact },
    Error,
}

impl Phase {
    fn state(&self) -> RecordingState {
        match self {
            Phase::Idle => RecordingState::Idle,
            Phase::Previewing { .. } => RecordingState::Previewing,
            Phase::Capturing(capture) if capture.paused => RecordingState::Paused,
            Phase::Capturing(_) => RecordingState::Recording,
            Phase::Stopped => RecordingState::Stopped,
            Phase::Reviewing { .. } => RecordingState::Reviewing,
            Phase::Uploading { .. } => RecordingState::Uploading,
            Phase::Error => RecordingState::Error,
        }
    }

    fn artifact(&self) -> Option<&RecordedArtifact> {
        match self {
            Phase::Reviewing { artifact } | Phase::Uploading { artifact } => Some(artifact),
            _ => None,
        }
    }
}

/// Result of toggling a capture constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintChange {
    /// New value of the toggled flag.
    pub enabled: bool,
    /// The live recording keeps its current tracks; the change applies to the next preview.
    pub applies_next_session: bool,
}

/// Drives one camera/microphone recording workflow at a time.
///
/// Transitions take `&mut self`, so requests are serialized by the borrow
/// checker. Wrap the controller in a `tokio::sync::Mutex` to share it; a
/// second `stop()` queued behind the first then finds `Reviewing` and is
/// rejected without touching the device or the artifact.
pub struct RecordingController {
    devices: Arc<dyn MediaDeviceProvider>,
    encoders: Arc<dyn EncoderBackend>,
    uploader: Arc<dyn UploadCollaborator>,
    options: RecorderOptions,
    constraints: CaptureConstraints,
    phase: Phase,
    timer: ElapsedTimer,
    last_failure: Option<FailureKind>,
    duration_warned: bool,
    snapshot_tx: watch::Sender<RecorderSnapshot>,
}

impl RecordingController {
    /// Create an idle controller.
    pub fn new(
        devices: Arc<dyn MediaDeviceProvider>,
        encoders: Arc<dyn EncoderBackend>,
        uploader: Arc<dyn UploadCollaborator>,
        options: RecorderOptions,
    ) -> Self {
        let constraints = options.constraints;
        let (snapshot_tx, _) = watch::channel(RecorderSnapshot {
            state: RecordingState::Idle,
            elapsed_seconds: 0,
            constraints,
            artifact: None,
            last_failure: None,
            exceeds_recommended_duration: false,
        });

        Self {
            devices,
            encoders,
            uploader,
            options,
            constraints,
            phase: Phase::Idle,
            timer: ElapsedTimer::default(),
            last_failure: None,
            duration_warned: false,
            snapshot_tx,
        }
    }

    /// Current state.
    pub fn state(&self) -> RecordingState {
        self.phase.state()
    }

    /// Seconds counted in the current session.
    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.seconds()
    }

    /// Pending artifact while reviewing or uploading.
    pub fn artifact(&self) -> Option<&RecordedArtifact> {
        self.phase.artifact()
    }

    /// Constraints the next preview will request.
    pub fn constraints(&self) -> CaptureConstraints {
        self.constraints
    }

    /// Format negotiated for the running session.
    pub fn negotiated_format(&self) -> Option<&EncodingFormat> {
        match &self.phase {
            Phase::Capturing(capture) => Some(capture.session.format()),
            _ => None,
        }
    }

    /// Identifier of the running session.
    pub fn session_id(&self) -> Option<Uuid> {
        match &self.phase {
            Phase::Capturing(capture) => Some(capture.session.id()),
            Phase::Reviewing { artifact } | Phase::Uploading { artifact } => {
                Some(artifact.session_id())
            }
            _ => None,
        }
    }

    /// Kind of the most recent failure.
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    /// Settings the controller was built with.
    pub fn options(&self) -> &RecorderOptions {
        &self.options
    }

    /// Observe state changes, ticks and artifact availability.
    pub fn subscribe(&self) -> watch::Receiver<RecorderSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Replace the constraints used by the next preview request.
    pub fn set_constraints(&mut self, constraints: CaptureConstraints) {
        self.constraints = constraints;
        self.publish();
    }

    /// Acquire a device with the current constraints and start previewing.
    ///
    /// Accepted from `Idle`, `Error` and `Previewing`; an open preview handle
    /// is released before the new one is requested. Also accepted from
    /// `Stopped`, which only survives when a `stop()` future was dropped.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` or `DeviceUnavailable` from the provider; the
    /// controller moves to `Error`.
    #[track_caller]
    pub fn request_preview(&mut self) -> impl Future<Output = CoreResult<()>> {
        let location = ErrorLocation::from(Location::caller());
        self.preview_at(location)
    }

    /// Store `constraints` and request a preview with them.
    #[track_caller]
    pub fn request_preview_with(
        &mut self,
        constraints: CaptureConstraints,
    ) -> impl Future<Output = CoreResult<()>> {
        let location = ErrorLocation::from(Location::caller());
        self.constraints = constraints;
        self.preview_at(location)
    }

    #[instrument(skip(self, location))]
    async fn preview_at(&mut self, location: ErrorLocation) -> CoreResult<()> {
        debug!(constraints = ?self.constraints, "Requesting preview");

        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle | Phase::Error => {}
            Phase::Stopped => {
                self.timer.reset();
                self.duration_warned = false;
            }
            Phase::Previewing { mut handle, .. } => {
                debug!(handle_id = %handle.id(), "Releasing previous preview handle");
                handle.release();
            }
            other => return Err(self.reject(other, Action::RequestPreview, location)),
        }

        let constraints = self.constraints;
        let acquired = Self::acquire(&self.devices, constraints, location).await;
        let handle = match acquired {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(e)),
        };
        info!(
            handle_id = %handle.id(),
            track_count = handle.tracks().len(),
            "Preview started"
        );
        self.phase = Phase::Previewing {
            handle,
            constraints,
        };
        self.last_failure = None;
        self.publish();
        Ok(())
    }

    /// Ask the provider for a stream matching `constraints`.
    async fn acquire(
        devices: &Arc<dyn MediaDeviceProvider>,
        constraints: CaptureConstraints,
        location: ErrorLocation,
    ) -> CoreResult<DeviceHandle> {
        if constraints.is_empty() {
            return Err(RecorderError::DeviceUnavailable {
                reason: "neither video nor audio requested".to_string(),
                location,
            });
        }

        match devices.acquire(&constraints).await {
            Ok(stream) => Ok(DeviceHandle::new(stream)),
            Err(DeviceError::PermissionDenied(reason)) => {
                Err(RecorderError::PermissionDenied { reason, location })
            }
            Err(DeviceError::Unavailable(reason)) => {
                Err(RecorderError::DeviceUnavailable { reason, location })
            }
        }
    }

    /// Negotiate a format, create the encoder and start recording.
    ///
    /// Constraints toggled during the preview take effect here: the preview
    /// handle is swapped for a freshly acquired one.
    ///
    /// # Errors
    ///
    /// Device errors when re-acquiring, `UnsupportedFormat` when no
    /// candidate is supported, `EncoderFailed` when the backend cannot
    /// start. All release the device and move to `Error`.
    #[track_caller]
    pub fn start(&mut self) -> impl Future<Output = CoreResult<()>> {
        let location = ErrorLocation::from(Location::caller());
        self.start_at(location)
    }

    #[instrument(skip(self, location))]
    async fn start_at(&mut self, location: ErrorLocation) -> CoreResult<()> {
        let mut handle = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Previewing {
                mut handle,
                constraints,
            } => {
                if constraints != self.constraints {
                    debug!(
                        handle_id = %handle.id(),
                        constraints = ?self.constraints,
                        "Constraints changed since preview, reacquiring devices"
                    );
                    handle.release();
                    let acquired = Self::acquire(&self.devices, self.constraints, location).await;
                    match acquired {
                        Ok(fresh) => fresh,
                        Err(e) => return Err(self.fail(e)),
                    }
                } else {
                    handle
                }
            }
            other => return Err(self.reject(other, Action::Start, location)),
        };

        let encoders = Arc::clone(&self.encoders);
        let Some(format) =
            negotiate_format(&self.options.formats, |f| encoders.supports_format(f)).cloned()
        else {
            handle.release();
            return Err(self.fail(RecorderError::UnsupportedFormat {
                candidates: self.options.formats.len(),
                location,
            }));
        };

        let (sink, events) = EncoderSink::channel();
        let mut encoder = match self.encoders.create_encoder(&handle, &format, sink) {
            Ok(encoder) => encoder,
            Err(e) => {
                handle.release();
                return Err(self.fail(RecorderError::EncoderFailed {
                    reason: format!("Failed to create encoder for {}: {}", format, e),
                    location,
                }));
            }
        };

        if let Err(e) = encoder.start(self.options.timeslice) {
            handle.release();
            return Err(self.fail(RecorderError::EncoderFailed {
                reason: format!("Failed to start encoder: {}", e),
                location,
            }));
        }

        let session = CaptureSession::new(format);
        info!(
            session_id = %session.id(),
            handle_id = %handle.id(),
            format = %session.format(),
            "Recording started"
        );

        self.timer.start();
        self.duration_warned = false;
        self.phase = Phase::Capturing(ActiveCapture {
            handle,
            encoder,
            events,
            session,
            paused: false,
            encoder_finished: false,
        });
        self.publish();

        Ok(())
    }

    /// Suspend the encoder and the ticker.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        let location = ErrorLocation::from(Location::caller());
        let from = self.state();

        let result = match &mut self.phase {
            Phase::Capturing(capture) if !capture.paused => {
                capture.drain_events();
                capture.encoder.pause().map(|()| {
                    capture.paused = true;
                    capture.session.id()
                })
            }
            _ => return Err(Self::rejected(from, Action::Pause, location)),
        };

        match result {
            Ok(session_id) => {
                self.timer.pause();
                info!(
                    session_id = %session_id,
                    elapsed_seconds = self.timer.seconds(),
                    "Recording paused"
                );
                self.publish();
                Ok(())
            }
            Err(e) => Err(self.abort_capture(RecorderError::EncoderFailed {
                reason: format!("Failed to pause encoder: {}", e),
                location,
            })),
        }
    }

    /// Continue recording after a pause.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        let location = ErrorLocation::from(Location::caller());
        let from = self.state();

        let result = match &mut self.phase {
            Phase::Capturing(capture) if capture.paused => {
                capture.drain_events();
                capture.encoder.resume().map(|()| {
                    capture.paused = false;
                    capture.session.id()
                })
            }
            _ => return Err(Self::rejected(from, Action::Resume, location)),
        };

        match result {
            Ok(session_id) => {
                self.timer.resume();
                info!(
                    session_id = %session_id,
                    elapsed_seconds = self.timer.seconds(),
                    "Recording resumed"
                );
                self.publish();
                Ok(())
            }
            Err(e) => Err(self.abort_capture(RecorderError::EncoderFailed {
                reason: format!("Failed to resume encoder: {}", e),
                location,
            })),
        }
    }

    /// Stop the encoder, release the device and assemble the artifact.
    ///
    /// Waits up to the configured stop grace for the encoder's final
    /// fragment. On success the controller is `Reviewing`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless recording or paused; `EncoderFailed` if
    /// the encoder refuses to stop (device released, state `Error`).
    #[track_caller]
    pub fn stop(&mut self) -> impl Future<Output = CoreResult<()>> {
        let location = ErrorLocation::from(Location::caller());
        self.stop_at(location)
    }

    #[instrument(skip(self, location))]
    async fn stop_at(&mut self, location: ErrorLocation) -> CoreResult<()> {
        let mut capture = match mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::Capturing(capture) => capture,
            other => return Err(self.reject(other, Action::Stop, location)),
        };
        self.timer.pause();
        self.publish();

        capture.drain_events();

        if let Err(e) = capture.encoder.stop() {
            capture.handle.release();
            self.timer.reset();
            return Err(self.fail(RecorderError::EncoderFailed {
                reason: format!("Failed to stop encoder: {}", e),
                location,
            }));
        }

        if !capture.encoder_finished {
            let session = &mut capture.session;
            let events = &mut capture.events;
            let flushed = tokio::time::timeout(self.options.stop_grace, async {
                while let Some(event) = events.recv().await {
                    match event {
                        EncoderEvent::Chunk(chunk) => {
                            session.push_chunk(chunk);
                        }
                        EncoderEvent::Stopped => break,
                    }
                }
            })
            .await;

            if flushed.is_err() {
                warn!(
                    session_id = %capture.session.id(),
                    grace_ms = self.options.stop_grace.as_millis(),
                    "Encoder did not confirm stop, assembling collected fragments"
                );
            }
        }

        capture.handle.release();

        let duration_seconds = self.timer.seconds();
        self.timer.reset();
        self.duration_warned = false;

        let artifact = capture.session.assemble(duration_seconds);
        info!(
            session_id = %artifact.session_id(),
            size_bytes = artifact.size_bytes(),
            mime_type = artifact.mime_type(),
            duration_seconds,
            "Recording stopped"
        );

        self.phase = Phase::Reviewing { artifact };
        self.last_failure = None;
        self.publish();

        Ok(())
    }

    /// Drop the reviewed artifact and return to `Idle`.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn discard(&mut self) -> CoreResult<()> {
        let location = ErrorLocation::from(Location::caller());

        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Reviewing { artifact } => {
                info!(session_id = %artifact.session_id(), "Recording discarded");
                self.timer.reset();
                self.last_failure = None;
                self.publish();
                Ok(())
            }
            other => Err(self.reject(other, Action::Discard, location)),
        }
    }

    /// Upload the reviewed artifact for `procedure_id`.
    ///
    /// On success the controller returns to `Idle`. On any upload failure it
    /// returns to `Reviewing` with the same artifact so the caller can retry.
    ///
    /// Also accepted from `Uploading`: with exclusive access that state only
    /// survives when a previous `save()` future was dropped mid-flight.
    ///
    /// # Errors
    ///
    /// `ArtifactTooLarge`, `UploadFailed` or `UploadTimedOut`.
    #[track_caller]
    pub fn save(
        &mut self,
        procedure_id: &str,
    ) -> impl Future<Output = CoreResult<UploadReceipt>> {
        let location = ErrorLocation::from(Location::caller());
        self.save_at(procedure_id, location)
    }

    #[instrument(skip(self, location))]
    async fn save_at(
        &mut self,
        procedure_id: &str,
        location: ErrorLocation,
    ) -> CoreResult<UploadReceipt> {
        let artifact = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Reviewing { artifact } | Phase::Uploading { artifact } => artifact,
            other => return Err(self.reject(other, Action::Save, location)),
        };

        let policy = self.options.upload;
        if let Some(max_bytes) = policy.max_size_bytes {
            if artifact.size_bytes() > max_bytes {
                let size_bytes = artifact.size_bytes();
                self.phase = Phase::Reviewing { artifact };
                return Err(self.fail_upload(RecorderError::ArtifactTooLarge {
                    size_bytes,
                    max_bytes,
                    location,
                }));
            }
        }

        self.phase = Phase::Uploading {
            artifact: artifact.clone(),
        };
        self.publish();

        info!(
            session_id = %artifact.session_id(),
            size_bytes = artifact.size_bytes(),
            "Uploading recording"
        );

        let uploader = Arc::clone(&self.uploader);
        let outcome =
            tokio::time::timeout(policy.timeout, uploader.upload(&artifact, procedure_id)).await;

        match outcome {
            Ok(Ok(receipt)) => {
                info!(
                    session_id = %artifact.session_id(),
                    location = %receipt.location,
                    "Recording uploaded"
                );
                self.phase = Phase::Idle;
                self.last_failure = None;
                self.publish();
                Ok(receipt)
            }
            Ok(Err(source)) => {
                self.phase = Phase::Reviewing { artifact };
                Err(self.fail_upload(RecorderError::UploadFailed { source, location }))
            }
            Err(_) => {
                self.phase = Phase::Reviewing { artifact };
                Err(self.fail_upload(RecorderError::UploadTimedOut {
                    timeout_ms: policy.timeout.as_millis(),
                    location,
                }))
            }
        }
    }

    /// Flip the video constraint for the next preview.
    #[instrument(skip(self))]
    pub fn toggle_video(&mut self) -> ConstraintChange {
        self.constraints.video_enabled = !self.constraints.video_enabled;
        let change = self.constraint_change(self.constraints.video_enabled);
        info!(
            enabled = change.enabled,
            deferred = change.applies_next_session,
            "Camera toggled"
        );
        self.publish();
        change
    }

    /// Flip the audio constraint for the next preview.
    #[instrument(skip(self))]
    pub fn toggle_audio(&mut self) -> ConstraintChange {
        self.constraints.audio_enabled = !self.constraints.audio_enabled;
        let change = self.constraint_change(self.constraints.audio_enabled);
        info!(
            enabled = change.enabled,
            deferred = change.applies_next_session,
            "Microphone toggled"
        );
        self.publish();
        change
    }

    /// One-second timer event. Counts only while recording.
    ///
    /// Returns whether the tick was counted.
    pub fn tick(&mut self) -> bool {
        if self.state() != RecordingState::Recording || !self.timer.tick() {
            return false;
        }

        let elapsed = self.timer.seconds();
        if !self.duration_warned && elapsed > self.options.recommended_max_seconds {
            self.duration_warned = true;
            warn!(
                elapsed_seconds = elapsed,
                recommended_max_seconds = self.options.recommended_max_seconds,
                "Recording exceeds recommended length"
            );
        }
        self.publish();
        true
    }

    /// Apply encoder events queued since the last call. Returns fragments kept.
    pub fn pump(&mut self) -> usize {
        match &mut self.phase {
            Phase::Capturing(capture) => capture.drain_events(),
            _ => 0,
        }
    }

    /// Release every resource and return to `Idle` from any state.
    ///
    /// Stops a running encoder, releases the device handle, clears the timer
    /// and drops any artifact. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        let previous = mem::replace(&mut self.phase, Phase::Idle);
        let previous_state = previous.state();

        match previous {
            Phase::Capturing(mut capture) => {
                if let Err(e) = capture.encoder.stop() {
                    error!(
                        session_id = %capture.session.id(),
                        error = %e,
                        "Encoder stop failed during teardown"
                    );
                }
                capture.handle.release();
            }
            Phase::Previewing { mut handle, .. } => handle.release(),
            _ => {}
        }

        self.timer.reset();
        self.duration_warned = false;
        self.last_failure = None;

        if previous_state != RecordingState::Idle {
            info!(from = ?previous_state, "Recorder torn down");
        }
        self.publish();
    }

    fn constraint_change(&self, enabled: bool) -> ConstraintChange {
        ConstraintChange {
            enabled,
            applies_next_session: self.state().is_capturing(),
        }
    }

    /// Restore `phase` and build a rejection for `action`.
    fn reject(&mut self, phase: Phase, action: Action, location: ErrorLocation) -> RecorderError {
        let from = phase.state();
        self.phase = phase;
        Self::rejected(from, action, location)
    }

    fn rejected(from: RecordingState, action: Action, location: ErrorLocation) -> RecorderError {
        debug!(from = ?from, action = %action, "Transition rejected");
        RecorderError::InvalidTransition {
            from,
            action,
            location,
        }
    }

    /// Enter `Error` after a device or encoder failure. Resources must already be released.
    fn fail(&mut self, err: RecorderError) -> RecorderError {
        error!(error = %err, "Recording session failed");
        self.phase = Phase::Error;
        self.last_failure = Some(err.kind());
        self.publish();
        err
    }

    /// Stop the running encoder, release the device and enter `Error`.
    fn abort_capture(&mut self, err: RecorderError) -> RecorderError {
        if let Phase::Capturing(mut capture) = mem::replace(&mut self.phase, Phase::Idle) {
            if let Err(e) = capture.encoder.stop() {
                error!(
                    session_id = %capture.session.id(),
                    error = %e,
                    "Encoder stop failed while aborting capture"
                );
            }
            capture.handle.release();
        }
        self.timer.reset();
        self.fail(err)
    }

    /// Record an upload failure. The artifact is already back in `Reviewing`.
    fn fail_upload(&mut self, err: RecorderError) -> RecorderError {
        warn!(error = %err, "Upload failed, recording kept for retry");
        self.last_failure = Some(err.kind());
        self.publish();
        err
    }

    fn publish(&self) {
        let snapshot = RecorderSnapshot {
            state: self.state(),
            elapsed_seconds: self.timer.seconds(),
            constraints: self.constraints,
            artifact: self.artifact().map(ArtifactSummary::from),
            last_failure: self.last_failure,
            exceeds_recommended_duration: self.timer.seconds()
                > self.options.recommended_max_seconds,
        };
        self.snapshot_tx.send_replace(snapshot);
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        if self.state() != RecordingState::Idle {
            self.teardown();
        }
    }
}
