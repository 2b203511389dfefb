use std::path::PathBuf;

use clap::Parser;

/// Record a procedure explanation video from a camera and microphone.
#[derive(Debug, Parser)]
#[command(name = "consent-recorder", version, about)]
pub(crate) struct Args {
    /// Procedure the recording will be attached to
    #[arg(long)]
    pub procedure_id: String,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
