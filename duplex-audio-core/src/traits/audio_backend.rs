use std::sync::Arc;

use crate::models::audio_models::{CallbackInfo, DeviceInfo, StreamControl};
use crate::models::config::DuplexConfig;
use crate::models::error::DuplexError;

/// Callback invoked with each captured block.
///
/// Parameters:
/// - raw mono 16-bit LE PCM bytes, `frame_count * 2` long;
/// - timing/status metadata for the block.
pub type CaptureCallback =
    Arc<dyn Fn(&[u8], &CallbackInfo) -> StreamControl + Send + Sync + 'static>;

/// Callback invoked for each block the backend needs to play.
///
/// The callback fills the whole output slice (`frame_count * 2` bytes of
/// mono 16-bit LE PCM).
pub type RenderCallback =
    Arc<dyn Fn(&mut [u8], &CallbackInfo) -> StreamControl + Send + Sync + 'static>;

/// Interface for platform audio backends that run a capture stream and a
/// render stream side by side.
///
/// Implemented by:
/// - `CpalDuplexBackend` (duplex-audio-cpal)
/// - `ManualBackend` (this crate, callbacks driven by the caller)
pub trait AudioBackend: Send + Sync {
    /// Whether the backend can currently open its devices.
    fn is_available(&self) -> bool;

    /// Open and start both streams, delivering blocks via the callbacks.
    ///
    /// Callbacks fire on backend-owned real-time threads. On error nothing
    /// is left running.
    fn start(
        &mut self,
        config: &DuplexConfig,
        capture: CaptureCallback,
        render: RenderCallback,
    ) -> Result<(), DuplexError>;

    /// Halt both streams. When this returns, no callback is running and
    /// none will fire again.
    fn stop(&mut self) -> Result<(), DuplexError>;

    /// Release the device handles. Called after `stop`.
    fn close(&mut self);

    /// The capture and render devices backing this backend.
    fn device_info(&self) -> Vec<DeviceInfo>;
}
