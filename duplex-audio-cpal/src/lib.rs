//! # duplex-audio-cpal
//!
//! cpal backend for duplex-audio-core.
//!
//! Provides:
//! - `CpalDuplexBackend`: mono i16 capture + render streams on the default
//!   cpal host (ALSA on Linux, CoreAudio on macOS, WASAPI on Windows)
//! - `DeviceEnumerator`: input/output device listing and lookup by name
//!
//! ## Usage
//! ```ignore
//! use duplex_audio_core::{DuplexConfig, DuplexEngine};
//! use duplex_audio_cpal::CpalDuplexBackend;
//!
//! let mut engine = DuplexEngine::new(CpalDuplexBackend::default_devices(), DuplexConfig::default());
//! engine.start()?;
//! engine.push(&speech_pcm);
//! while let Some(frame) = engine.pop_mic_frame() {
//!     // send upstream
//! }
//! engine.stop()?;
//! ```

pub mod cpal_backend;
pub mod device_enumerator;

pub use cpal_backend::CpalDuplexBackend;
pub use device_enumerator::DeviceEnumerator;
