//! Mock implementations for unit testing.
//!
//! `ScriptedSource` stands in for the microphone so recorder tests can run
//! without a real audio device: it delivers a fixed fragment script on open,
//! or fails with a simulated acquisition outcome.

use crate::capture::{CaptureError, CaptureHandle, CaptureSource, Fragment, FragmentSink};

/// Capture source that delivers scripted fragments or a scripted failure.
pub struct ScriptedSource {
    fragments: Vec<Fragment>,
    failure: Option<CaptureError>,
    sample_rate: u32,
}

impl ScriptedSource {
    /// A source that delivers the given fragments, in order, on every open.
    pub fn delivering(fragments: Vec<Fragment>) -> Self {
        Self {
            fragments,
            failure: None,
            sample_rate: 16000,
        }
    }

    /// A source whose acquisition is refused by the user/OS.
    pub fn denying_permission() -> Self {
        Self {
            fragments: Vec::new(),
            failure: Some(CaptureError::PermissionDenied),
            sample_rate: 16000,
        }
    }

    /// A source with no usable input device.
    pub fn without_device() -> Self {
        Self {
            fragments: Vec::new(),
            failure: Some(CaptureError::DeviceUnavailable),
            sample_rate: 16000,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

struct ScriptedHandle {
    sample_rate: u32,
}

impl CaptureHandle for ScriptedHandle {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl CaptureSource for ScriptedSource {
    fn open(&self, sink: FragmentSink) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        for fragment in &self.fragments {
            sink.push(fragment.clone());
        }

        Ok(Box::new(ScriptedHandle {
            sample_rate: self.sample_rate,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureSession;

    #[test]
    fn scripted_source_delivers_in_order() {
        let source = ScriptedSource::delivering(vec![vec![1], vec![2], vec![3]]);
        let mut session = CaptureSession::new();
        session.begin();

        let handle = source.open(session.sink()).unwrap();
        assert_eq!(handle.sample_rate(), 16000);

        session.finalize(handle.sample_rate());
        assert_eq!(session.buffer().unwrap().bytes(), &[1, 2, 3]);
    }

    #[test]
    fn scripted_failures_surface_on_open() {
        let session = CaptureSession::new();
        assert!(matches!(
            ScriptedSource::denying_permission().open(session.sink()),
            Err(CaptureError::PermissionDenied)
        ));
        assert!(matches!(
            ScriptedSource::without_device().open(session.sink()),
            Err(CaptureError::DeviceUnavailable)
        ));
    }

    #[test]
    fn sample_rate_override() {
        let source = ScriptedSource::delivering(vec![]).with_sample_rate(48000);
        let session = CaptureSession::new();
        let handle = source.open(session.sink()).unwrap();
        assert_eq!(handle.sample_rate(), 48000);
    }
}
