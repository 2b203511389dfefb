use crate::{AppCommand, AppResult};

use std::time::Duration;

use consent_recorder_core::{RecorderSnapshot, RecordingController, format_elapsed};
use tokio::{
    sync::mpsc,
    time::MissedTickBehavior,
};
use tracing::{error, info, instrument, warn};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Main application state.
///
/// Owns the controller; every command and timer tick runs on this task, so
/// transitions never interleave.
pub struct App {
    pub(crate) controller: RecordingController,
    pub(crate) procedure_id: String,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self), fields(procedure_id = %self.procedure_id))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Consent recorder starting");
        print_help();

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(AppCommand::Quit) => {
                        info!("Shutdown requested");
                        break;
                    }
                    Some(cmd) => {
                        if let Err(e) = self.handle_command(cmd).await {
                            error!(command = ?cmd, error = %e, "Command failed");
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                },

                _ = ticker.tick() => {
                    self.controller.pump();
                    if self.controller.tick() {
                        let snapshot = self.controller.subscribe().borrow().clone();
                        print_elapsed(&snapshot);
                    }
                }
            }
        }

        self.controller.teardown();

        info!("Consent recorder shut down successfully");

        Ok(())
    }

    /// Apply one operator command to the controller.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Preview => {
                self.controller.request_preview().await?;
                println!("Preview ready. Type 'start' to record.");
            }
            AppCommand::Start => {
                self.controller.start().await?;
                let format = self
                    .controller
                    .negotiated_format()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                println!("Recording ({})", format);
            }
            AppCommand::Pause => {
                self.controller.pause()?;
                println!("Paused at {}", format_elapsed(self.controller.elapsed_seconds()));
            }
            AppCommand::Resume => {
                self.controller.resume()?;
                println!("Recording resumed");
            }
            AppCommand::Stop => {
                self.controller.stop().await?;
                if let Some(artifact) = self.controller.artifact() {
                    println!(
                        "Recorded {} ({} bytes, {}). Type 'save' or 'discard'.",
                        format_elapsed(artifact.duration_seconds()),
                        artifact.size_bytes(),
                        artifact.mime_type()
                    );
                }
            }
            AppCommand::Discard => {
                self.controller.discard()?;
                println!("Recording discarded");
            }
            AppCommand::Save => {
                let receipt = self.controller.save(&self.procedure_id).await?;
                println!("Saved to {}", receipt.location);
            }
            AppCommand::ToggleVideo => {
                let change = self.controller.toggle_video();
                report_toggle("Video", change.enabled, change.applies_next_session);
            }
            AppCommand::ToggleAudio => {
                let change = self.controller.toggle_audio();
                report_toggle("Audio", change.enabled, change.applies_next_session);
            }
            AppCommand::Status => {
                let snapshot = self.controller.subscribe().borrow().clone();
                print_status(&snapshot);
            }
            AppCommand::Quit => {
                warn!("Quit is handled by the event loop");
            }
        }

        Ok(())
    }
}

fn print_help() {
    println!(
        "Commands: preview, start, pause, resume, stop, discard, save, video, audio, status, quit"
    );
}

fn print_elapsed(snapshot: &RecorderSnapshot) {
    if snapshot.exceeds_recommended_duration {
        println!(
            "{} (over the recommended length)",
            format_elapsed(snapshot.elapsed_seconds)
        );
    } else {
        println!("{}", format_elapsed(snapshot.elapsed_seconds));
    }
}

fn print_status(snapshot: &RecorderSnapshot) {
    println!(
        "state={:?} elapsed={} video={} audio={}",
        snapshot.state,
        format_elapsed(snapshot.elapsed_seconds),
        snapshot.constraints.video_enabled,
        snapshot.constraints.audio_enabled
    );
    if let Some(artifact) = &snapshot.artifact {
        println!(
            "pending recording: {} bytes, {}, {}",
            artifact.size_bytes,
            artifact.mime_type,
            format_elapsed(artifact.duration_seconds)
        );
    }
    if let Some(kind) = snapshot.last_failure {
        println!("last failure: {:?} (recoverable: {})", kind, kind.is_recoverable());
    }
}

fn report_toggle(label: &str, enabled: bool, applies_next_session: bool) {
    let value = if enabled { "on" } else { "off" };
    if applies_next_session {
        println!("{} {} from the next recording", label, value);
    } else {
        println!("{} {}", label, value);
    }
}
