/// Growable circular byte buffer.
///
/// Not thread-safe on its own. Wrap in `parking_lot::Mutex` for
/// cross-thread access (see `PlaybackBuffer`).
///
/// Overflow behavior: never drops data. A write that does not fit grows the
/// backing store and linearizes the content. Reads copy out of the ring and
/// never allocate.
#[derive(Debug)]
pub struct ByteRingBuffer {
    buffer: Vec<u8>,
    read_index: usize,
    available: usize,
}

impl ByteRingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity],
            read_index: 0,
            available: 0,
        }
    }

    /// Append `bytes` at the tail, growing if needed.
    pub fn write(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        let required = self.available + bytes.len();
        if required > self.buffer.len() {
            self.grow(required);
        }

        let capacity = self.buffer.len();
        let write_index = (self.read_index + self.available) % capacity;
        let first = bytes.len().min(capacity - write_index);
        self.buffer[write_index..write_index + first].copy_from_slice(&bytes[..first]);
        self.buffer[..bytes.len() - first].copy_from_slice(&bytes[first..]);
        self.available += bytes.len();
    }

    /// Move up to `out.len()` bytes from the head into `out`.
    ///
    /// Returns the number of bytes copied. Bytes of `out` past that count
    /// are left untouched.
    pub fn read_into(&mut self, out: &mut [u8]) -> usize {
        let to_read = out.len().min(self.available);
        if to_read == 0 {
            return 0;
        }

        let capacity = self.buffer.len();
        let first = to_read.min(capacity - self.read_index);
        out[..first].copy_from_slice(&self.buffer[self.read_index..self.read_index + first]);
        out[first..to_read].copy_from_slice(&self.buffer[..to_read - first]);

        self.available -= to_read;
        self.read_index = if self.available == 0 {
            0
        } else {
            (self.read_index + to_read) % capacity
        };
        to_read
    }

    /// Number of bytes currently available for reading.
    pub fn count(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    /// Drop all buffered bytes. Keeps the allocation.
    pub fn reset(&mut self) {
        self.read_index = 0;
        self.available = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn grow(&mut self, required: usize) {
        let new_capacity = required.max(self.buffer.len() * 2);
        let mut grown = vec![0; new_capacity];
        let count = self.available;
        self.read_into(&mut grown[..count]);
        self.buffer = grown;
        self.read_index = 0;
        self.available = count;
    }
}

impl Default for ByteRingBuffer {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(buf: &mut ByteRingBuffer, count: usize) -> Vec<u8> {
        let mut out = vec![0; count];
        let n = buf.read_into(&mut out);
        out.truncate(n);
        out
    }

    #[test]
    fn basic_write_read() {
        let mut buf = ByteRingBuffer::new(10);
        buf.write(&[1, 2, 3]);

        assert_eq!(buf.count(), 3);
        assert_eq!(read(&mut buf, 3), vec![1, 2, 3]);
        assert!(buf.is_empty());
    }

    #[test]
    fn read_partial() {
        let mut buf = ByteRingBuffer::new(10);
        buf.write(&[1, 2, 3, 4, 5]);

        assert_eq!(read(&mut buf, 3), vec![1, 2, 3]);
        assert_eq!(buf.count(), 2);

        let rest = read(&mut buf, 10); // request more than available
        assert_eq!(rest, vec![4, 5]);
        assert!(buf.is_empty());
    }

    #[test]
    fn short_read_leaves_tail_of_output_untouched() {
        let mut buf = ByteRingBuffer::new(4);
        buf.write(&[9, 9]);

        let mut out = [7u8; 4];
        assert_eq!(buf.read_into(&mut out), 2);
        assert_eq!(out, [9, 9, 7, 7]);
    }

    #[test]
    fn overflow_grows_instead_of_dropping() {
        let mut buf = ByteRingBuffer::new(4);
        buf.write(&[1, 2, 3, 4]);
        buf.write(&[5, 6]);

        assert_eq!(buf.count(), 6);
        assert!(buf.capacity() >= 6);
        assert_eq!(read(&mut buf, 6), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn wraparound() {
        let mut buf = ByteRingBuffer::new(4);

        buf.write(&[1, 2, 3]);
        read(&mut buf, 2); // read_index = 2

        buf.write(&[4, 5, 6]); // wraps around

        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.count(), 4);
        assert_eq!(read(&mut buf, 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn grow_while_wrapped_keeps_order() {
        let mut buf = ByteRingBuffer::new(4);
        buf.write(&[1, 2, 3, 4]);
        read(&mut buf, 3);
        buf.write(&[5, 6]); // wrapped: [5, 6, _, 4]
        buf.write(&[7, 8, 9]); // forces growth

        assert_eq!(read(&mut buf, 100), vec![4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn zero_capacity_start() {
        let mut buf = ByteRingBuffer::default();
        assert_eq!(buf.capacity(), 0);
        assert!(read(&mut buf, 4).is_empty());

        buf.write(&[1, 2]);
        assert_eq!(read(&mut buf, 4), vec![1, 2]);
    }

    #[test]
    fn reset_clears_buffer() {
        let mut buf = ByteRingBuffer::new(10);
        buf.write(&[1, 2, 3]);
        buf.reset();

        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 10);
        assert!(read(&mut buf, 10).is_empty());
    }

    #[test]
    fn empty_operations() {
        let mut buf = ByteRingBuffer::new(10);

        assert!(buf.is_empty());
        assert!(read(&mut buf, 5).is_empty());

        buf.write(&[]);
        assert!(buf.is_empty());
    }
}
