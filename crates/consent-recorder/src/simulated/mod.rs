//! Hardware-free capture backend used by the headless host.

mod device;
mod encoder;

pub(crate) use {
    device::SimulatedDeviceProvider,
    encoder::SimulatedEncoderBackend,
};

#[cfg(test)]
pub(crate) use encoder::{FRAGMENT_BYTES, STREAM_MAGIC, synthetic_fragment};
