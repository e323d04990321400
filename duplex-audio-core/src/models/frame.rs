/// Bytes per mono 16-bit PCM sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// One block of mono, 16-bit signed little-endian PCM.
///
/// Produced by the capture path and handed to the application by
/// `DuplexEngine::pop_mic_frame`. The bytes are kept exactly as captured
/// (or as attenuated), so a well-formed backend always yields an even
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioFrame(Vec<u8>);

impl AudioFrame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encode `samples` as little-endian bytes.
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        Self(bytes)
    }

    /// A block of `sample_count` zero samples.
    pub fn silence(sample_count: usize) -> Self {
        Self(vec![0; sample_count * BYTES_PER_SAMPLE])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of whole samples. A trailing odd byte is not counted.
    pub fn sample_count(&self) -> usize {
        self.0.len() / BYTES_PER_SAMPLE
    }

    /// Decode whole samples in order.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.0
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
    }

    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl From<Vec<u8>> for AudioFrame {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<AudioFrame> for Vec<u8> {
    fn from(frame: AudioFrame) -> Self {
        frame.0
    }
}

impl AsRef<[u8]> for AudioFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_little_endian() {
        let frame = AudioFrame::new(vec![0x01, 0x02, 0xFF, 0xFF]);
        let samples: Vec<i16> = frame.samples().collect();
        assert_eq!(samples, vec![0x0201, -1]);
    }

    #[test]
    fn from_samples_encodes_le() {
        let frame = AudioFrame::from_samples(&[1, -2, i16::MAX]);
        assert_eq!(frame.as_bytes(), &[0x01, 0x00, 0xFE, 0xFF, 0xFF, 0x7F]);
        assert_eq!(frame.sample_count(), 3);
    }

    #[test]
    fn odd_trailing_byte_is_ignored_by_sample_view() {
        let frame = AudioFrame::new(vec![0x10, 0x00, 0x7F]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.sample_count(), 1);
        assert_eq!(frame.samples().collect::<Vec<_>>(), vec![16]);
    }

    #[test]
    fn silence() {
        let frame = AudioFrame::silence(4);
        assert_eq!(frame.len(), 8);
        assert!(frame.is_silent());
        assert!(!AudioFrame::from_samples(&[0, 1]).is_silent());
    }
}
