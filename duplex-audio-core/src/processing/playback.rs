use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::ring_buffer::ByteRingBuffer;

/// Result of one render drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drain {
    /// Bytes of real audio copied into the output block.
    pub served: usize,
    /// Zero bytes appended after the real audio.
    pub padded: usize,
}

impl Drain {
    /// The whole block was real audio.
    pub fn is_full(&self) -> bool {
        self.padded == 0
    }
}

/// Not-yet-played audio plus the ducking flag derived from draining it.
///
/// The application appends with [`push`](Self::push); the render callback
/// drains with [`render_into`](Self::render_into). The ducking flag is
/// written only by the drain, inside the same critical section, and read
/// lock-free by the capture path.
#[derive(Debug, Default)]
pub struct PlaybackBuffer {
    ring: Mutex<ByteRingBuffer>,
    ducking: AtomicBool,
}

impl PlaybackBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the backing store for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(ByteRingBuffer::new(capacity)),
            ducking: AtomicBool::new(false),
        }
    }

    /// Append `payload` at the tail. Unbounded.
    pub fn push(&self, payload: &[u8]) {
        self.ring.lock().write(payload);
    }

    /// Fill `out` completely.
    ///
    /// If at least `out.len()` bytes are buffered, the first `out.len()`
    /// bytes are moved into `out` and ducking turns on. Otherwise everything
    /// buffered is moved, the remainder of `out` is zero-filled, the buffer
    /// is left empty and ducking turns off.
    pub fn render_into(&self, out: &mut [u8]) -> Drain {
        let mut ring = self.ring.lock();
        let needed = out.len();

        if ring.count() >= needed {
            ring.read_into(out);
            self.ducking.store(true, Ordering::Release);
            return Drain {
                served: needed,
                padded: 0,
            };
        }

        let served = ring.read_into(out);
        ring.reset();
        out[served..].fill(0);
        self.ducking.store(false, Ordering::Release);
        Drain {
            served,
            padded: needed - served,
        }
    }

    /// Whether the last drain served real audio.
    pub fn is_ducking(&self) -> bool {
        self.ducking.load(Ordering::Acquire)
    }

    /// Bytes waiting to be rendered.
    pub fn len(&self) -> usize {
        self.ring.lock().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(buffer: &PlaybackBuffer, frame_count: usize) -> (Vec<u8>, Drain) {
        let mut out = vec![0xAA; frame_count * 2];
        let drain = buffer.render_into(&mut out);
        (out, drain)
    }

    #[test]
    fn full_drain_returns_prefix_and_ducks() {
        let buffer = PlaybackBuffer::new();
        let payload: Vec<u8> = (0..10).collect();
        buffer.push(&payload);

        let (out, drain) = render(&buffer, 3);

        assert_eq!(out, payload[..6].to_vec());
        assert_eq!(drain, Drain { served: 6, padded: 0 });
        assert!(drain.is_full());
        assert_eq!(buffer.len(), 4);
        assert!(buffer.is_ducking());
    }

    #[test]
    fn exact_fit_empties_buffer_and_ducks() {
        let buffer = PlaybackBuffer::new();
        buffer.push(&[1, 2, 3, 4]);

        let (out, _) = render(&buffer, 2);

        assert_eq!(out, vec![1, 2, 3, 4]);
        assert!(buffer.is_empty());
        assert!(buffer.is_ducking());
    }

    #[test]
    fn underrun_pads_with_zeros_and_unducks() {
        let buffer = PlaybackBuffer::new();
        buffer.push(&[1, 2, 3, 4, 5, 6, 7, 8]);
        render(&buffer, 2);
        assert!(buffer.is_ducking());

        let (out, drain) = render(&buffer, 4);

        assert_eq!(out, vec![5, 6, 7, 8, 0, 0, 0, 0]);
        assert_eq!(drain, Drain { served: 4, padded: 4 });
        assert!(buffer.is_empty());
        assert!(!buffer.is_ducking());
    }

    #[test]
    fn odd_leftover_is_flushed_on_underrun() {
        let buffer = PlaybackBuffer::new();
        buffer.push(&[9, 9, 9]);

        let (out, drain) = render(&buffer, 2);

        assert_eq!(out, vec![9, 9, 9, 0]);
        assert_eq!(drain.padded, 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn repeated_renders_on_empty_are_silent() {
        let buffer = PlaybackBuffer::with_capacity(64);
        for _ in 0..5 {
            let (out, drain) = render(&buffer, 8);
            assert_eq!(out.len(), 16);
            assert!(out.iter().all(|&b| b == 0));
            assert_eq!(drain.served, 0);
            assert!(!buffer.is_ducking());
        }
    }

    #[test]
    fn successive_drains_preserve_push_order() {
        let buffer = PlaybackBuffer::with_capacity(4);
        buffer.push(&[1, 2, 3]);
        buffer.push(&[4, 5]);
        buffer.push(&[6, 7, 8, 9, 10]);

        let (first, _) = render(&buffer, 2);
        buffer.push(&[11, 12]);
        let (second, _) = render(&buffer, 2);
        let (third, _) = render(&buffer, 2);

        assert_eq!(first, vec![1, 2, 3, 4]);
        assert_eq!(second, vec![5, 6, 7, 8]);
        assert_eq!(third, vec![9, 10, 11, 12]);
    }
}
