#[allow(clippy::module_inception)]
mod controller;
mod options;
mod snapshot;

pub use {
    controller::{ConstraintChange, RecordingController},
    options::{
        DEFAULT_RECOMMENDED_MAX_SECONDS, DEFAULT_STOP_GRACE, DEFAULT_TIMESLICE, RecorderOptions,
    },
    snapshot::{ArtifactSummary, RecorderSnapshot},
};
