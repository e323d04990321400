use std::sync::Arc;

use crate::session::shared::{DuplexHandle, EngineShared};
use crate::models::audio_models::{CallbackInfo, DeviceInfo, EngineDiagnostics};
use crate::models::config::DuplexConfig;
use crate::models::error::DuplexError;
use crate::models::frame::AudioFrame;
use crate::models::state::EngineState;
use crate::processing::ducking::FixedGain;
use crate::traits::audio_backend::{AudioBackend, CaptureCallback, RenderCallback};

/// Blocks of playback to pre-allocate so steady-state pushes don't grow
/// the ring.
const PLAYBACK_PREALLOC_BLOCKS: usize = 16;

/// Full-duplex engine: mic capture with ducking plus buffered playback.
///
/// Generic over the device layer via the `AudioBackend` trait.
///
/// Data flow:
/// ```text
///                       ┌──────── ducking flag ────────┐
///                       ▼                              │
/// [Backend capture] → [duck] → [CaptureQueue] → pop_mic_frame()
///
/// push() → [PlaybackBuffer] → [drain / pad] → [Backend render]
/// ```
///
/// The render drain sets the ducking flag: real audio played means the mic
/// is attenuated on the next capture block, silence means it is not.
pub struct DuplexEngine<B: AudioBackend> {
    backend: B,
    config: DuplexConfig,
    state: EngineState,
    shared: Arc<EngineShared>,
}

impl<B: AudioBackend> DuplexEngine<B> {
    pub fn new(backend: B, config: DuplexConfig) -> Self {
        let prealloc = config.bytes_per_buffer() * PLAYBACK_PREALLOC_BLOCKS;
        // An out-of-range gain never reaches a callback: start() rejects it.
        let gain = FixedGain::from_linear(config.ducking_gain).unwrap_or(FixedGain::UNITY);
        let shared = Arc::new(EngineShared::new(gain, prealloc));
        Self {
            backend,
            config,
            state: EngineState::Stopped,
            shared,
        }
    }

    pub fn with_default_config(backend: B) -> Self {
        Self::new(backend, DuplexConfig::default())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &DuplexConfig {
        &self.config
    }

    pub fn device_info(&self) -> Vec<DeviceInfo> {
        self.backend.device_info()
    }

    /// A cloneable handle for pushing and popping from other threads.
    pub fn handle(&self) -> DuplexHandle {
        DuplexHandle::new(Arc::clone(&self.shared))
    }

    /// Open both streams and start the callbacks. Transitions: stopped → started.
    ///
    /// A backend failure leaves the engine stopped and is returned as is.
    pub fn start(&mut self) -> Result<(), DuplexError> {
        if self.state.is_started() {
            return Err(DuplexError::InvalidState("engine already started".into()));
        }

        self.config
            .validate()
            .map_err(DuplexError::ConfigurationFailed)?;

        if !self.backend.is_available() {
            return Err(DuplexError::DeviceNotAvailable);
        }

        let capture: CaptureCallback = {
            let shared = Arc::clone(&self.shared);
            Arc::new(move |input: &[u8], info: &CallbackInfo| shared.on_capture(input, info))
        };
        let render: RenderCallback = {
            let shared = Arc::clone(&self.shared);
            Arc::new(move |out: &mut [u8], info: &CallbackInfo| shared.on_render(out, info))
        };

        if let Err(e) = self.backend.start(&self.config, capture, render) {
            log::error!("Failed to start duplex streams: {}", e);
            return Err(e);
        }

        self.state = EngineState::Started;
        log::info!(
            "Duplex engine started: rate={}Hz, block={} samples ({:.1}ms), ducking gain={}",
            self.config.sample_rate,
            self.config.frames_per_buffer,
            self.config.buffer_duration().as_secs_f64() * 1000.0,
            self.config.ducking_gain,
        );
        Ok(())
    }

    /// Stop both streams, then release the device. Transitions: started → stopped.
    ///
    /// Buffered playback and queued mic frames are kept. A no-op when
    /// already stopped.
    pub fn stop(&mut self) -> Result<(), DuplexError> {
        if self.state.is_stopped() {
            return Ok(());
        }

        let stopped = self.backend.stop();
        if let Err(ref e) = stopped {
            log::warn!("Backend stop reported an error: {}", e);
        }
        self.backend.close();
        self.state = EngineState::Stopped;

        let diag = self.shared.diagnostics();
        log::info!(
            "Duplex engine stopped: {} capture blocks ({} ducked), {} render blocks ({} underruns)",
            diag.capture_callback_count,
            diag.ducked_frame_count,
            diag.render_callback_count,
            diag.underrun_count,
        );
        stopped
    }

    /// Append audio to be played.
    pub fn push(&self, payload: &[u8]) {
        self.shared.push(payload);
    }

    /// Oldest captured mic frame, or `None` when nothing is queued.
    pub fn pop_mic_frame(&self) -> Option<AudioFrame> {
        self.shared.pop_mic_frame()
    }

    /// Whether the last render block was real audio (mic is being ducked).
    pub fn is_ducking(&self) -> bool {
        self.shared.is_ducking()
    }

    pub fn buffered_playback_bytes(&self) -> usize {
        self.shared.buffered_playback_bytes()
    }

    pub fn pending_mic_frames(&self) -> usize {
        self.shared.pending_mic_frames()
    }

    pub fn diagnostics(&self) -> EngineDiagnostics {
        self.shared.diagnostics()
    }
}

impl<B: AudioBackend> Drop for DuplexEngine<B> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Error stopping duplex engine on drop: {}", e);
        }
    }
}
