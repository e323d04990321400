use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::audio_models::{CallbackInfo, EngineDiagnostics, StreamControl};
use crate::models::frame::AudioFrame;
use crate::processing::capture_queue::CaptureQueue;
use crate::processing::ducking::{duck_block, Ducked, FixedGain};
use crate::processing::playback::PlaybackBuffer;

/// Lock-free counters bumped from the callback threads.
#[derive(Debug, Default)]
struct EngineStats {
    capture_callbacks: AtomicU64,
    ducked_frames: AtomicU64,
    attenuation_fallbacks: AtomicU64,
    render_callbacks: AtomicU64,
    underruns: AtomicU64,
    bytes_rendered: AtomicU64,
    bytes_padded: AtomicU64,
    bytes_pushed: AtomicU64,
}

impl EngineStats {
    fn snapshot(&self) -> EngineDiagnostics {
        EngineDiagnostics {
            capture_callback_count: self.capture_callbacks.load(Ordering::Relaxed),
            ducked_frame_count: self.ducked_frames.load(Ordering::Relaxed),
            attenuation_fallback_count: self.attenuation_fallbacks.load(Ordering::Relaxed),
            render_callback_count: self.render_callbacks.load(Ordering::Relaxed),
            underrun_count: self.underruns.load(Ordering::Relaxed),
            bytes_rendered: self.bytes_rendered.load(Ordering::Relaxed),
            bytes_padded: self.bytes_padded.load(Ordering::Relaxed),
            bytes_pushed: self.bytes_pushed.load(Ordering::Relaxed),
        }
    }
}

/// State shared between the callback threads and application threads.
#[derive(Debug)]
pub(crate) struct EngineShared {
    playback: PlaybackBuffer,
    capture: CaptureQueue,
    ducking_gain: FixedGain,
    stats: EngineStats,
}

impl EngineShared {
    pub(crate) fn new(ducking_gain: FixedGain, playback_capacity: usize) -> Self {
        Self {
            playback: PlaybackBuffer::with_capacity(playback_capacity),
            capture: CaptureQueue::new(),
            ducking_gain,
            stats: EngineStats::default(),
        }
    }

    /// Capture path: duck if playback is audible, then enqueue.
    pub(crate) fn on_capture(&self, input: &[u8], _info: &CallbackInfo) -> StreamControl {
        self.stats.capture_callbacks.fetch_add(1, Ordering::Relaxed);

        let ducked = duck_block(input, self.playback.is_ducking(), self.ducking_gain);
        match ducked {
            Ducked::Attenuated(_) => {
                self.stats.ducked_frames.fetch_add(1, Ordering::Relaxed);
            }
            Ducked::Fallback(_) => {
                self.stats.attenuation_fallbacks.fetch_add(1, Ordering::Relaxed);
            }
            Ducked::Passthrough(_) => {}
        }

        self.capture.push(AudioFrame::new(ducked.into_bytes()));
        StreamControl::Continue
    }

    /// Render path: drain exactly `out.len()` bytes, padding with silence.
    pub(crate) fn on_render(&self, out: &mut [u8], _info: &CallbackInfo) -> StreamControl {
        let drain = self.playback.render_into(out);

        self.stats.render_callbacks.fetch_add(1, Ordering::Relaxed);
        self.stats
            .bytes_rendered
            .fetch_add(drain.served as u64, Ordering::Relaxed);
        if !drain.is_full() {
            self.stats.underruns.fetch_add(1, Ordering::Relaxed);
            self.stats
                .bytes_padded
                .fetch_add(drain.padded as u64, Ordering::Relaxed);
        }
        StreamControl::Continue
    }

    pub(crate) fn push(&self, payload: &[u8]) {
        self.playback.push(payload);
        self.stats
            .bytes_pushed
            .fetch_add(payload.len() as u64, Ordering::Relaxed);
    }

    pub(crate) fn pop_mic_frame(&self) -> Option<AudioFrame> {
        self.capture.pop()
    }

    pub(crate) fn is_ducking(&self) -> bool {
        self.playback.is_ducking()
    }

    pub(crate) fn buffered_playback_bytes(&self) -> usize {
        self.playback.len()
    }

    pub(crate) fn pending_mic_frames(&self) -> usize {
        self.capture.len()
    }

    pub(crate) fn diagnostics(&self) -> EngineDiagnostics {
        self.stats.snapshot()
    }
}

/// Cloneable handle for application threads.
///
/// Pushes playback audio and polls captured mic frames without touching
/// the engine lifecycle. Stays valid across start/stop and after the
/// engine is dropped (the buffers simply stop moving).
#[derive(Debug, Clone)]
pub struct DuplexHandle {
    shared: Arc<EngineShared>,
}

impl DuplexHandle {
    pub(crate) fn new(shared: Arc<EngineShared>) -> Self {
        Self { shared }
    }

    /// Append audio to be played. Never blocks on the render thread for
    /// longer than one drain.
    pub fn push(&self, payload: &[u8]) {
        self.shared.push(payload);
    }

    /// Oldest captured mic frame, or `None` when nothing is queued.
    pub fn pop_mic_frame(&self) -> Option<AudioFrame> {
        self.shared.pop_mic_frame()
    }

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
