pub mod capture_queue;
pub mod ducking;
pub mod playback;
pub mod ring_buffer;
