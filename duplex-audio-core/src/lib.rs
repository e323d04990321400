//! # duplex-audio-core
//!
//! Platform-agnostic full-duplex audio engine for voice devices.
//!
//! Captures mic audio and plays buffered speech at the same time, and
//! attenuates ("ducks") the mic by a fixed gain while speech is audible.
//! Platform backends (cpal, or the in-process `ManualBackend`) implement
//! the `AudioBackend` trait and plug into the generic `DuplexEngine`.
//!
//! ## Architecture
//!
//! ```text
//! duplex-audio-core (this crate)
//! ├── traits/       ← AudioBackend, CaptureCallback, RenderCallback
//! ├── models/       ← DuplexError, EngineState, DuplexConfig, AudioFrame, diagnostics
//! ├── processing/   ← ByteRingBuffer, PlaybackBuffer, CaptureQueue, ducking gain
//! └── session/      ← DuplexEngine, DuplexHandle, ManualBackend
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use session::duplex::DuplexEngine;
pub use session::manual::{BackendEvent, ManualBackend, ManualDriver};
pub use session::shared::DuplexHandle;
pub use models::audio_models::{CallbackInfo, DeviceInfo, EngineDiagnostics, StreamControl, StreamDirection};
pub use models::config::DuplexConfig;
pub use models::error::DuplexError;
pub use models::frame::{AudioFrame, BYTES_PER_SAMPLE};
pub use models::state::EngineState;
pub use processing::capture_queue::CaptureQueue;
pub use processing::ducking::FixedGain;
pub use processing::playback::{Drain, PlaybackBuffer};
pub use processing::ring_buffer::ByteRingBuffer;
pub use traits::audio_backend::{AudioBackend, CaptureCallback, RenderCallback};
