use crate::{capture::DeviceHandle, encoding::EncodingFormat};

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;

/// Events an encoder reports back to the controller, in temporal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// An encoded fragment is available.
    Chunk(Bytes),
    /// The encoder has flushed its last fragment and stopped.
    Stopped,
}

/// Failure reported by an encoder backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EncoderError(pub String);

/// Channel an encoder uses to deliver [`EncoderEvent`]s.
///
/// Sends after the controller has dropped its receiver are ignored.
#[derive(Debug, Clone)]
pub struct EncoderSink {
    tx: mpsc::UnboundedSender<EncoderEvent>,
}

impl EncoderSink {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<EncoderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver an encoded fragment.
    pub fn chunk(&self, data: impl Into<Bytes>) {
        let _ = self.tx.send(EncoderEvent::Chunk(data.into()));
    }

    /// Signal that the final fragment has been delivered.
    pub fn stopped(&self) {
        let _ = self.tx.send(EncoderEvent::Stopped);
    }

    /// Whether the controller is still listening.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A running encoder bound to one device handle.
pub trait Encoder: Send {
    /// Begin emitting a fragment every `timeslice`.
    fn start(&mut self, timeslice: Duration) -> Result<(), EncoderError>;

    /// Stop emitting fragments until [`resume`](Self::resume).
    fn pause(&mut self) -> Result<(), EncoderError>;

    /// Continue emitting fragments.
    fn resume(&mut self) -> Result<(), EncoderError>;

    /// Flush the last fragment, then report [`EncoderEvent::Stopped`].
    fn stop(&mut self) -> Result<(), EncoderError>;
}

/// Capability probe and factory for encoders.
pub trait EncoderBackend: Send + Sync {
    /// Whether `format` can be recorded in this runtime.
    fn supports_format(&self, format: &EncodingFormat) -> bool;

    /// Create an encoder consuming `handle`'s stream in `format`.
    fn create_encoder(
        &self,
        handle: &DeviceHandle,
        format: &EncodingFormat,
        sink: EncoderSink,
    ) -> Result<Box<dyn Encoder>, EncoderError>;
}
