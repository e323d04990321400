use thiserror::Error;

/// Errors that can occur while configuring or running the duplex engine.
///
/// Underruns and empty mic queues are not errors: the render path pads
/// with silence and `pop_mic_frame` returns `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DuplexError {
    #[error("device not available")]
    DeviceNotAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("stream failed: {0}")]
    StreamFailed(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}
