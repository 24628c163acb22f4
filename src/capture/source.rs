//! Capture device abstraction.
//!
//! The `Recorder` acquires audio through these traits instead of talking to
//! the platform media API directly, so tests can run against a scripted
//! source without a real input device.

use std::fmt;

/// Errors from acquiring or driving an audio input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or OS refused access to the input device
    PermissionDenied,
    /// No compatible input device exists
    DeviceUnavailable,
    /// A recording is already in progress for this session
    AlreadyRecording,
    /// The audio backend failed for another reason
    Backend(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => {
                write!(f, "Microphone access was denied. Grant permission and try again.")
            }
            Self::DeviceUnavailable => {
                write!(f, "No audio input device available")
            }
            Self::AlreadyRecording => write!(f, "A recording is already in progress"),
            Self::Backend(msg) => write!(f, "Audio backend error: {msg}"),
        }
    }
}

impl std::error::Error for CaptureError {}

/// A source of captured audio fragments.
///
/// `open` acquires the device and begins delivering fragments to the sink in
/// arrival order. Acquisition failures are terminal for the attempt; the
/// caller may retry with a fresh `open`.
pub trait CaptureSource {
    fn open(
        &self,
        sink: crate::capture::FragmentSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError>;
}

/// An open capture. Dropping the handle stops fragment delivery and releases
/// the device; release is deterministic and safe to repeat.
pub trait CaptureHandle {
    /// Sample rate the device is actually delivering at.
    fn sample_rate(&self) -> u32;
}
