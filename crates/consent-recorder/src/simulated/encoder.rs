use consent_recorder_core::{
    DeviceHandle, Encoder, EncoderBackend, EncoderError, EncoderSink, EncodingFormat,
};

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Size of each synthetic fragment.
pub(crate) const FRAGMENT_BYTES: usize = 4096;

/// Magic prefix of the first fragment, so output files are recognisable.
pub(crate) const STREAM_MAGIC: &[u8] = b"CRSIM1";

/// Build the `seq`-th fragment for `format`.
///
/// Fragment 0 starts with [`STREAM_MAGIC`] and the format string; every
/// fragment carries its sequence number and a repeating byte pattern.
pub(crate) fn synthetic_fragment(format: &EncodingFormat, seq: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(FRAGMENT_BYTES);
    if seq == 0 {
        buf.put_slice(STREAM_MAGIC);
        buf.put_slice(format.to_string().as_bytes());
        buf.put_u8(0);
    }
    buf.put_u64(seq);
    let fill = (seq % 251) as u8;
    while buf.len() < FRAGMENT_BYTES {
        buf.put_u8(fill);
    }
    buf.freeze()
}

#[derive(Debug, Clone, Copy)]
enum Control {
    Pause,
    Resume,
    Stop,
}

/// Encoder backend producing deterministic fragments instead of real video.
#[derive(Debug)]
pub struct SimulatedEncoderBackend {
    supported: Vec<EncodingFormat>,
}

impl SimulatedEncoderBackend {
    /// Backend supporting exactly `supported`.
    pub fn new(supported: Vec<EncodingFormat>) -> Self {
        Self { supported }
    }
}

impl Default for SimulatedEncoderBackend {
    /// A runtime without vp9: webm/vp8 with or without opus, plain webm and mp4.
    fn default() -> Self {
        Self::new(vec![
            EncodingFormat::new("video/webm", &["vp8", "opus"]),
            EncodingFormat::new("video/webm", &["vp8"]),
            EncodingFormat::new("video/webm", &[]),
            EncodingFormat::new("video/mp4", &[]),
        ])
    }
}

impl EncoderBackend for SimulatedEncoderBackend {
    fn supports_format(&self, format: &EncodingFormat) -> bool {
        self.supported.contains(format)
    }

    fn create_encoder(
        &self,
        handle: &DeviceHandle,
        format: &EncodingFormat,
        sink: EncoderSink,
    ) -> Result<Box<dyn Encoder>, EncoderError> {
        if handle.is_released() {
            return Err(EncoderError("device handle already released".to_string()));
        }
        debug!(handle_id = %handle.id(), format = %format, "Simulated encoder created");

        Ok(Box::new(SimulatedEncoder {
            format: format.clone(),
            sink,
            control_tx: None,
            task: None,
        }))
    }
}

/// Emits one synthetic fragment per timeslice on a tokio task.
pub struct SimulatedEncoder {
    format: EncodingFormat,
    sink: EncoderSink,
    control_tx: Option<mpsc::UnboundedSender<Control>>,
    task: Option<JoinHandle<()>>,
}

impl SimulatedEncoder {
    fn send(&self, control: Control) -> Result<(), EncoderError> {
        let tx = self
            .control_tx
            .as_ref()
            .ok_or_else(|| EncoderError("encoder not started".to_string()))?;
        tx.send(control)
            .map_err(|_| EncoderError("encoder task has exited".to_string()))
    }
}

impl Encoder for SimulatedEncoder {
    fn start(&mut self, timeslice: Duration) -> Result<(), EncoderError> {
        if self.task.is_some() {
            return Err(EncoderError("encoder already started".to_string()));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| EncoderError(format!("no async runtime: {}", e)))?;

        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let sink = self.sink.clone();
        let format = self.format.clone();

        self.task = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + timeslice, timeslice);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            let mut paused = false;

            loop {
                tokio::select! {
                    _ = interval.tick(), if !paused => {
                        sink.chunk(synthetic_fragment(&format, seq));
                        seq += 1;
                    }
                    control = control_rx.recv() => match control {
                        Some(Control::Pause) => paused = true,
                        Some(Control::Resume) => {
                            paused = false;
                            interval.reset();
                        }
                        Some(Control::Stop) | None => {
                            // Flush the partial timeslice like a real encoder would.
                            sink.chunk(synthetic_fragment(&format, seq));
                            sink.stopped();
                            break;
                        }
                    }
                }
            }
        }));
        self.control_tx = Some(control_tx);

        Ok(())
    }

    fn pause(&mut self) -> Result<(), EncoderError> {
        self.send(Control::Pause)
    }

    fn resume(&mut self) -> Result<(), EncoderError> {
        self.send(Control::Resume)
    }

    fn stop(&mut self) -> Result<(), EncoderError> {
        self.send(Control::Stop)
    }
}

impl Drop for SimulatedEncoder {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                warn!("Simulated encoder dropped while running, aborting task");
                task.abort();
            }
        }
    }
}
