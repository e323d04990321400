use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::models::frame::AudioFrame;

/// FIFO of captured mic frames.
///
/// The capture callback appends at the tail; application threads poll the
/// head. Every access takes the lock, and only for the single push or pop.
#[derive(Debug, Default)]
pub struct CaptureQueue {
    frames: Mutex<VecDeque<AudioFrame>>,
}

impl CaptureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, frame: AudioFrame) {
        self.frames.lock().push_back(frame);
    }

    /// Remove the oldest frame, or `None` if nothing is queued.
    pub fn pop(&self) -> Option<AudioFrame> {
        self.frames.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_capture_order() {
        let queue = CaptureQueue::new();
        for i in 0..4i16 {
            queue.push(AudioFrame::from_samples(&[i, i]));
        }

        assert_eq!(queue.len(), 4);
        for i in 0..4i16 {
            assert_eq!(queue.pop(), Some(AudioFrame::from_samples(&[i, i])));
        }
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_on_empty_is_none() {
        let queue = CaptureQueue::new();
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn interleaved_push_pop() {
        let queue = CaptureQueue::new();
        queue.push(AudioFrame::new(vec![1, 0]));
        queue.push(AudioFrame::new(vec![2, 0]));
        assert_eq!(queue.pop().unwrap().as_bytes(), &[1, 0]);
        queue.push(AudioFrame::new(vec![3, 0]));
        assert_eq!(queue.pop().unwrap().as_bytes(), &[2, 0]);
        assert_eq!(queue.pop().unwrap().as_bytes(), &[3, 0]);
        assert!(queue.pop().is_none());
    }
}
