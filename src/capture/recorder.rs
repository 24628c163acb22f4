//! Recording lifecycle management.
//!
//! The `Recorder` owns the capture session and the open device handle. The
//! state machine is `idle → recording → stopped → idle`; stopping always
//! finalizes whatever was captured, and starting a new recording discards the
//! previous session before any new fragment accumulates.

use super::session::{AudioBuffer, CaptureSession, SessionStatus};
use super::source::{CaptureError, CaptureHandle, CaptureSource};

pub struct Recorder {
    source: Box<dyn CaptureSource>,
    session: CaptureSession,
    handle: Option<Box<dyn CaptureHandle>>,
    sample_rate: u32,
}

impl Recorder {
    pub fn new(source: Box<dyn CaptureSource>) -> Self {
        Self {
            source,
            session: CaptureSession::new(),
            handle: None,
            sample_rate: 0,
        }
    }

    /// Acquires the input device and begins accumulating fragments.
    ///
    /// Any previous buffer is discarded before the device is opened. On
    /// failure the session returns to idle and the error is terminal for
    /// this attempt; a later call may retry from idle.
    ///
    /// # Errors
    /// - `AlreadyRecording` if a capture is in progress
    /// - `PermissionDenied` if device access is refused
    /// - `DeviceUnavailable` if no usable input device exists
    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        if self.session.status() == SessionStatus::Recording {
            return Err(CaptureError::AlreadyRecording);
        }

        self.session.begin();

        match self.source.open(self.session.sink()) {
            Ok(handle) => {
                self.sample_rate = handle.sample_rate();
                self.handle = Some(handle);
                tracing::debug!("Capture started at {}Hz", self.sample_rate);
                Ok(())
            }
            Err(e) => {
                self.session.reset();
                tracing::error!("Failed to open capture source: {e}");
                Err(e)
            }
        }
    }

    /// Stops capture, releases the device, and finalizes the buffer.
    ///
    /// No-op when not recording; safe to call repeatedly.
    pub fn stop_recording(&mut self) {
        if self.session.status() != SessionStatus::Recording {
            return;
        }

        // Dropping the handle stops fragment delivery and releases the device.
        self.handle = None;
        self.session.finalize(self.sample_rate);

        let bytes = self.session.buffer().map_or(0, AudioBuffer::len);
        tracing::info!("Capture stopped: {bytes} bytes recorded");
    }

    /// Discards the session and returns to idle. Releases the device if a
    /// handle is somehow still held.
    pub fn clear_recording(&mut self) {
        self.handle = None;
        self.session.reset();
        tracing::debug!("Capture session cleared");
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn is_recording(&self) -> bool {
        self.session.status() == SessionStatus::Recording
    }

    /// The finalized buffer, present only after a stop.
    pub fn buffer(&self) -> Option<&AudioBuffer> {
        self.session.buffer()
    }

    /// Bytes accumulated so far in the current session.
    pub fn captured_len(&self) -> usize {
        self.session.captured_len()
    }

    /// Actual device sample rate, known once a capture has started.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mocks::ScriptedSource;

    #[test]
    fn records_scripted_fragments_into_buffer() {
        let source = ScriptedSource::delivering(vec![vec![1, 2], vec![3, 4]]);
        let mut recorder = Recorder::new(Box::new(source));

        recorder.start_recording().unwrap();
        assert!(recorder.is_recording());

        recorder.stop_recording();
        assert_eq!(recorder.status(), SessionStatus::Stopped);
        assert_eq!(recorder.buffer().unwrap().bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn stop_when_idle_is_a_no_op() {
        let mut recorder = Recorder::new(Box::new(ScriptedSource::delivering(vec![])));
        recorder.stop_recording();
        assert_eq!(recorder.status(), SessionStatus::Idle);
        assert!(recorder.buffer().is_none());
    }

    #[test]
    fn stop_when_already_stopped_keeps_buffer() {
        let source = ScriptedSource::delivering(vec![vec![7]]);
        let mut recorder = Recorder::new(Box::new(source));
        recorder.start_recording().unwrap();
        recorder.stop_recording();
        recorder.stop_recording();
        assert_eq!(recorder.buffer().unwrap().bytes(), &[7]);
    }

    #[test]
    fn start_while_recording_is_rejected() {
        let source = ScriptedSource::delivering(vec![vec![1]]);
        let mut recorder = Recorder::new(Box::new(source));
        recorder.start_recording().unwrap();
        assert_eq!(
            recorder.start_recording(),
            Err(CaptureError::AlreadyRecording)
        );
        assert!(recorder.is_recording());
    }

    #[test]
    fn restart_discards_previous_buffer() {
        // The source delivers the same fragments on every open; if the old
        // session leaked into the new one the buffer would double.
        let source = ScriptedSource::delivering(vec![vec![1, 2], vec![3]]);
        let mut recorder = Recorder::new(Box::new(source));

        recorder.start_recording().unwrap();
        recorder.stop_recording();
        assert_eq!(recorder.buffer().unwrap().bytes(), &[1, 2, 3]);

        recorder.start_recording().unwrap();
        recorder.stop_recording();
        assert_eq!(recorder.buffer().unwrap().bytes(), &[1, 2, 3]);
    }

    #[test]
    fn clear_returns_to_idle_from_every_state() {
        let mut recorder = Recorder::new(Box::new(ScriptedSource::delivering(vec![vec![1]])));

        recorder.clear_recording();
        assert_eq!(recorder.status(), SessionStatus::Idle);

        recorder.start_recording().unwrap();
        recorder.clear_recording();
        assert_eq!(recorder.status(), SessionStatus::Idle);
        assert!(recorder.buffer().is_none());

        recorder.start_recording().unwrap();
        recorder.stop_recording();
        recorder.clear_recording();
        assert_eq!(recorder.status(), SessionStatus::Idle);
        assert!(recorder.buffer().is_none());
    }

    #[test]
    fn permission_denied_leaves_session_idle() {
        let mut recorder = Recorder::new(Box::new(ScriptedSource::denying_permission()));
        assert_eq!(
            recorder.start_recording(),
            Err(CaptureError::PermissionDenied)
        );
        assert_eq!(recorder.status(), SessionStatus::Idle);

        // The attempt is retryable from idle.
        assert_eq!(
            recorder.start_recording(),
            Err(CaptureError::PermissionDenied)
        );
    }

    #[test]
    fn missing_device_leaves_session_idle() {
        let mut recorder = Recorder::new(Box::new(ScriptedSource::without_device()));
        assert_eq!(
            recorder.start_recording(),
            Err(CaptureError::DeviceUnavailable)
        );
        assert_eq!(recorder.status(), SessionStatus::Idle);
        assert!(recorder.buffer().is_none());
    }

    #[test]
    fn stop_with_no_fragments_finalizes_empty_buffer() {
        let mut recorder = Recorder::new(Box::new(ScriptedSource::delivering(vec![])));
        recorder.start_recording().unwrap();
        recorder.stop_recording();
        assert_eq!(recorder.status(), SessionStatus::Stopped);
        assert!(recorder.buffer().unwrap().is_empty());
    }
}
