//! Caller-driven backend: a test and offline utility.
//!
//! No device is opened. The caller plays the role of the audio device and
//! decides when capture and render blocks happen, which is what the session
//! tests need and what offline processing (files, pipes) wants. Real
//! deployments use a device backend such as `duplex-audio-cpal`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::models::audio_models::{CallbackInfo, DeviceInfo, StreamControl, StreamDirection};
use crate::models::config::DuplexConfig;
use crate::models::error::DuplexError;
use crate::models::frame::BYTES_PER_SAMPLE;
use crate::traits::audio_backend::{AudioBackend, CaptureCallback, RenderCallback};

/// Lifecycle calls observed by a `ManualBackend`, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    Started,
    Stopped,
    Closed,
}

struct Callbacks {
    capture: CaptureCallback,
    render: RenderCallback,
}

struct Control {
    available: bool,
    frames_per_buffer: usize,
    events: Vec<BackendEvent>,
    fail_next_start: Option<DuplexError>,
}

struct Inner {
    // Callbacks run under the read lock; `stop` takes the write lock, so it
    // waits out any block in flight.
    callbacks: RwLock<Option<Callbacks>>,
    control: Mutex<Control>,
}

/// In-process backend. Pair it with the `ManualDriver` returned by
/// [`ManualBackend::new`].
pub struct ManualBackend {
    inner: Arc<Inner>,
}

/// Caller side of a `ManualBackend`: fires capture and render blocks.
#[derive(Clone)]
pub struct ManualDriver {
    inner: Arc<Inner>,
}

impl ManualBackend {
    pub fn new() -> (Self, ManualDriver) {
        let inner = Arc::new(Inner {
            callbacks: RwLock::new(None),
            control: Mutex::new(Control {
                available: true,
                frames_per_buffer: 0,
                events: Vec::new(),
                fail_next_start: None,
            }),
        });
        (
            Self {
                inner: Arc::clone(&inner),
            },
            ManualDriver { inner },
        )
    }
}

impl AudioBackend for ManualBackend {
    fn is_available(&self) -> bool {
        self.inner.control.lock().available
    }

    fn start(
        &mut self,
        config: &DuplexConfig,
        capture: CaptureCallback,
        render: RenderCallback,
    ) -> Result<(), DuplexError> {
        let mut callbacks = self.inner.callbacks.write();
        if callbacks.is_some() {
            return Err(DuplexError::InvalidState("manual backend already running".into()));
        }

        {
            let mut control = self.inner.control.lock();
            if let Some(err) = control.fail_next_start.take() {
                return Err(err);
            }
            control.frames_per_buffer = config.frames_per_buffer as usize;
            control.events.push(BackendEvent::Started);
        }

        *callbacks = Some(Callbacks { capture, render });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DuplexError> {
        self.inner.callbacks.write().take();
        self.inner.control.lock().events.push(BackendEvent::Stopped);
        Ok(())
    }

    fn close(&mut self) {
        self.inner.control.lock().events.push(BackendEvent::Closed);
    }

    fn device_info(&self) -> Vec<DeviceInfo> {
        vec![
            DeviceInfo {
                name: "manual-capture".into(),
                direction: StreamDirection::Capture,
                is_default: true,
            },
            DeviceInfo {
                name: "manual-render".into(),
                direction: StreamDirection::Render,
                is_default: true,
            },
        ]
    }
}

impl ManualDriver {
    /// Deliver one captured block. `None` if the backend is not running.
    pub fn capture(&self, block: &[u8]) -> Option<StreamControl> {
        let callbacks = self.inner.callbacks.read();
        let callbacks = callbacks.as_ref()?;
        let info = CallbackInfo::new(block.len() / BYTES_PER_SAMPLE);
        Some((callbacks.capture)(block, &info))
    }

    /// Request one render block of the configured size.
    pub fn render(&self) -> Option<Vec<u8>> {
        let frame_count = self.inner.control.lock().frames_per_buffer;
        self.render_frames(frame_count)
    }

    /// Request one render block of `frame_count` samples.
    pub fn render_frames(&self, frame_count: usize) -> Option<Vec<u8>> {
        let callbacks = self.inner.callbacks.read();
        let callbacks = callbacks.as_ref()?;
        let mut out = vec![0; frame_count * BYTES_PER_SAMPLE];
        (callbacks.render)(&mut out, &CallbackInfo::new(frame_count));
        Some(out)
    }

    pub fn is_running(&self) -> bool {
        self.inner.callbacks.read().is_some()
    }

    pub fn events(&self) -> Vec<BackendEvent> {
        self.inner.control.lock().events.clone()
    }

    /// Make the next `start` fail with `err`.
    pub fn fail_next_start(&self, err: DuplexError) {
        self.inner.control.lock().fail_next_start = Some(err);
    }

    pub fn set_available(&self, available: bool) {
        self.inner.control.lock().available = available;
    }
}
