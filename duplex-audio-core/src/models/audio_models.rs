/// Direction of an audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamDirection {
    Capture,
    Render,
}

/// An audio device available for capture or playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub direction: StreamDirection,
    pub is_default: bool,
}

/// Metadata the backend hands to each callback.
///
/// Timing and status are informational only. The engine never turns a
/// status flag into an error; uninterrupted capture wins over fidelity
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CallbackInfo {
    /// Samples in the block.
    pub frame_count: usize,
    /// Stream time of the block in seconds, when the backend knows it.
    pub timestamp_secs: Option<f64>,
    /// Backend reported an overflow/underflow before this block.
    pub status_flagged: bool,
}

impl CallbackInfo {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            ..Default::default()
        }
    }
}

/// Value a callback returns to tell the backend whether to keep streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamControl {
    Continue,
    Stop,
}

/// Counters for debugging a running engine.
///
/// All counters only ever increase for the lifetime of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineDiagnostics {
    pub capture_callback_count: u64,
    pub ducked_frame_count: u64,
    pub attenuation_fallback_count: u64,
    pub render_callback_count: u64,
    pub underrun_count: u64,
    pub bytes_rendered: u64,
    pub bytes_padded: u64,
    pub bytes_pushed: u64,
}
