//! Capture session state machine.
//!
//! A `CaptureSession` tracks one recording attempt: fragments accumulate in
//! delivery order while recording, and stopping concatenates them into a
//! single immutable buffer. The fragment list lives behind an `Arc<Mutex<_>>`
//! so the audio driver callback can append to it from its own thread.

use std::sync::{Arc, Mutex};

/// One raw audio fragment as delivered by the capture device.
pub type Fragment = Vec<u8>;

/// Lifecycle state of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No capture in progress and no buffer held
    Idle,
    /// Device is open and fragments are accumulating
    Recording,
    /// Capture finished; the finalized buffer is available
    Stopped,
}

/// Finalized, immutable audio produced by one capture session.
///
/// Byte content is the ordered concatenation of the session's fragments
/// (i16 little-endian mono PCM when captured from the microphone source).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    bytes: Arc<[u8]>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sample rate the fragments were captured at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Write end of a session's fragment list, handed to the capture source.
///
/// Cloneable so the device callback can own one while the session keeps the
/// read side. Fragments are appended in call order.
#[derive(Clone)]
pub struct FragmentSink {
    chunks: Arc<Mutex<Vec<Fragment>>>,
}

impl FragmentSink {
    pub fn push(&self, fragment: Fragment) {
        self.chunks.lock().unwrap().push(fragment);
    }
}

/// State for one recording attempt.
pub struct CaptureSession {
    status: SessionStatus,
    chunks: Arc<Mutex<Vec<Fragment>>>,
    buffer: Option<AudioBuffer>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            chunks: Arc::new(Mutex::new(Vec::new())),
            buffer: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Starts a fresh recording attempt, discarding any previous chunks and
    /// buffer before new fragments can accumulate.
    pub fn begin(&mut self) {
        self.chunks.lock().unwrap().clear();
        self.buffer = None;
        self.status = SessionStatus::Recording;
    }

    /// Returns the write end handed to the capture source for this session.
    pub fn sink(&self) -> FragmentSink {
        FragmentSink {
            chunks: Arc::clone(&self.chunks),
        }
    }

    /// Number of bytes accumulated so far.
    pub fn captured_len(&self) -> usize {
        self.chunks.lock().unwrap().iter().map(Vec::len).sum()
    }

    /// Concatenates the accumulated fragments into the immutable buffer and
    /// transitions to `Stopped`. No-op unless currently recording; stopping
    /// always finalizes, even a zero-length capture.
    pub fn finalize(&mut self, sample_rate: u32) {
        if self.status != SessionStatus::Recording {
            return;
        }

        let chunks = self.chunks.lock().unwrap();
        let total: usize = chunks.iter().map(Vec::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in chunks.iter() {
            bytes.extend_from_slice(chunk);
        }
        drop(chunks);

        self.buffer = Some(AudioBuffer {
            bytes: bytes.into(),
            sample_rate,
        });
        self.status = SessionStatus::Stopped;
    }

    /// Discards chunks and buffer and returns to `Idle`, regardless of the
    /// current state.
    pub fn reset(&mut self) {
        self.chunks.lock().unwrap().clear();
        self.buffer = None;
        self.status = SessionStatus::Idle;
    }

    pub fn buffer(&self) -> Option<&AudioBuffer> {
        self.buffer.as_ref()
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_concatenates_fragments_in_order() {
        let mut session = CaptureSession::new();
        session.begin();

        let sink = session.sink();
        sink.push(vec![1, 2]);
        sink.push(vec![3]);
        sink.push(vec![4, 5, 6]);

        session.finalize(16000);

        assert_eq!(session.status(), SessionStatus::Stopped);
        let buffer = session.buffer().unwrap();
        assert_eq!(buffer.bytes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(buffer.sample_rate(), 16000);
    }

    #[test]
    fn fragment_order_changes_buffer_content() {
        let mut forward = CaptureSession::new();
        forward.begin();
        forward.sink().push(vec![1, 2]);
        forward.sink().push(vec![3, 4]);
        forward.finalize(16000);

        let mut reversed = CaptureSession::new();
        reversed.begin();
        reversed.sink().push(vec![3, 4]);
        reversed.sink().push(vec![1, 2]);
        reversed.finalize(16000);

        assert_ne!(
            forward.buffer().unwrap().bytes(),
            reversed.buffer().unwrap().bytes()
        );
    }

    #[test]
    fn finalize_when_idle_is_a_no_op() {
        let mut session = CaptureSession::new();
        session.finalize(16000);
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.buffer().is_none());
    }

    #[test]
    fn finalize_when_already_stopped_keeps_buffer() {
        let mut session = CaptureSession::new();
        session.begin();
        session.sink().push(vec![9]);
        session.finalize(16000);

        // A second finalize must not touch the existing buffer.
        session.sink().push(vec![7]);
        session.finalize(16000);
        assert_eq!(session.buffer().unwrap().bytes(), &[9]);
    }

    #[test]
    fn finalize_with_no_fragments_produces_empty_buffer() {
        let mut session = CaptureSession::new();
        session.begin();
        session.finalize(48000);

        assert_eq!(session.status(), SessionStatus::Stopped);
        assert!(session.buffer().unwrap().is_empty());
    }

    #[test]
    fn reset_returns_to_idle_from_any_state() {
        let mut recording = CaptureSession::new();
        recording.begin();
        recording.sink().push(vec![1]);
        recording.reset();
        assert_eq!(recording.status(), SessionStatus::Idle);
        assert!(recording.buffer().is_none());
        assert_eq!(recording.captured_len(), 0);

        let mut stopped = CaptureSession::new();
        stopped.begin();
        stopped.sink().push(vec![1]);
        stopped.finalize(16000);
        stopped.reset();
        assert_eq!(stopped.status(), SessionStatus::Idle);
        assert!(stopped.buffer().is_none());

        let mut idle = CaptureSession::new();
        idle.reset();
        assert_eq!(idle.status(), SessionStatus::Idle);
    }

    #[test]
    fn begin_discards_previous_buffer_and_chunks() {
        let mut session = CaptureSession::new();
        session.begin();
        session.sink().push(vec![1, 2, 3]);
        session.finalize(16000);
        assert!(session.buffer().is_some());

        session.begin();
        assert_eq!(session.status(), SessionStatus::Recording);
        assert!(session.buffer().is_none());
        assert_eq!(session.captured_len(), 0);
    }
}
