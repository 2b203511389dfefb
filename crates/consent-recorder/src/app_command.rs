use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands typed by the operator on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Acquire camera/microphone and show the preview.
    Preview,
    /// Begin recording from the preview.
    Start,
    /// Suspend recording.
    Pause,
    /// Continue a paused recording.
    Resume,
    /// Finish recording and enter review.
    Stop,
    /// Throw away the reviewed recording.
    Discard,
    /// Upload the reviewed recording.
    Save,
    /// Flip the video constraint.
    ToggleVideo,
    /// Flip the audio constraint.
    ToggleAudio,
    /// Print the current snapshot.
    Status,
    /// Tear down and exit.
    Quit,
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preview" | "p" => Ok(AppCommand::Preview),
            "start" | "record" | "r" => Ok(AppCommand::Start),
            "pause" => Ok(AppCommand::Pause),
            "resume" => Ok(AppCommand::Resume),
            "stop" | "s" => Ok(AppCommand::Stop),
            "discard" | "retake" => Ok(AppCommand::Discard),
            "save" | "upload" => Ok(AppCommand::Save),
            "video" => Ok(AppCommand::ToggleVideo),
            "audio" => Ok(AppCommand::ToggleAudio),
            "status" | "?" => Ok(AppCommand::Status),
            "quit" | "exit" | "q" => Ok(AppCommand::Quit),
            _ => Err(AppError::InvalidCommand {
                input: s.trim().to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
