//! Audio capture: session state machine, recorder lifecycle, and the
//! device abstraction with its cpal implementation.

pub mod microphone;
pub mod recorder;
pub mod session;
pub mod source;
pub mod wav;

pub use microphone::MicrophoneSource;
pub use recorder::Recorder;
pub use session::{AudioBuffer, CaptureSession, Fragment, FragmentSink, SessionStatus};
pub use source::{CaptureError, CaptureHandle, CaptureSource};
