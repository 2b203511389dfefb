//! Consent Recorder: headless host for procedure explanation recordings.
//!
//! Reads operator commands from stdin, drives a [`RecordingController`] over
//! a simulated capture backend and files saved recordings in a directory.

mod app;
mod app_command;
mod cli;
mod config;
mod directory_uploader;
mod error;
mod simulated;
mod stdin_reader;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    directory_uploader::DirectoryUploader,
    error::{AppError, Result as AppResult},
};

use crate::{
    cli::Args,
    config::Config,
    simulated::{SimulatedDeviceProvider, SimulatedEncoderBackend},
    stdin_reader::spawn_stdin_reader,
};

use std::{sync::Arc, time::Duration};

use clap::Parser;
use consent_recorder_core::RecordingController;
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "consent_recorder=debug,consent_recorder_core=debug";

/// Application entry point.
fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let options = match config.recorder_options() {
        Ok(o) => o,
        Err(e) => {
            error!("Invalid recorder settings: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let controller = RecordingController::new(
            Arc::new(SimulatedDeviceProvider),
            Arc::new(SimulatedEncoderBackend::default()),
            Arc::new(DirectoryUploader::new(config.upload.output_dir.clone())),
            options,
        );

        let (command_tx, command_rx) = mpsc::channel(32);
        // Detached: blocked on stdin until the next line or EOF.
        let _stdin_handle = spawn_stdin_reader(command_tx);

        let app = App {
            controller,
            procedure_id: args.procedure_id,
            command_rx,
        };

        if let Err(e) = app.run().await {
            error!(error = ?e, "App error");
        }
    });

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_timeout(Duration::from_secs(1));
}
