mod constraints;
mod device;

pub use constraints::{CaptureConstraints, DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH};
pub use device::{
    DeviceError, DeviceHandle, MediaDeviceProvider, MediaStream, Track, TrackKind,
};
