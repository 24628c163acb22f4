//! cpal-backed capture source.
//!
//! Opens the configured input device (or the system default), downmixes the
//! device's native channel layout to mono, and pushes each callback's samples
//! to the session sink as one little-endian PCM fragment. The stream handle
//! stops capture and releases the device when dropped.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::session::{Fragment, FragmentSink};
use super::source::{CaptureError, CaptureHandle, CaptureSource};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Microphone capture source.
///
/// `device` is "default", a device name, or a numeric index from
/// `murmur list-devices`. The device records at its own native rate; the
/// requested rate is only a preference, and the actual rate is reported on
/// the returned handle.
pub struct MicrophoneSource {
    device_name: String,
    requested_sample_rate: u32,
}

impl MicrophoneSource {
    pub fn new(device_name: String, requested_sample_rate: u32) -> Self {
        Self {
            device_name,
            requested_sample_rate,
        }
    }
}

struct MicrophoneHandle {
    // Kept alive for the duration of the capture; dropping it stops the stream.
    _stream: cpal::Stream,
    sample_rate: u32,
}

impl CaptureHandle for MicrophoneHandle {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl CaptureSource for MicrophoneSource {
    fn open(&self, sink: FragmentSink) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        // Acquire the device while suppressing ALSA library warnings
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or(CaptureError::DeviceUnavailable)
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {}", device_name);

        let device_config = device
            .default_input_config()
            .map_err(|e| classify_backend_error(&e.to_string()))?;
        let sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;

        if sample_rate != self.requested_sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Recording at device rate.",
                self.requested_sample_rate,
                sample_rate
            );
        }

        tracing::debug!(
            "Device configuration: {}Hz, {} channels",
            sample_rate,
            num_channels
        );

        let stream = device
            .build_input_stream(
                &device_config.into(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    sink.push(downmix_to_fragment(data, num_channels));
                },
                |err| {
                    tracing::error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| classify_backend_error(&e.to_string()))?;

        stream
            .play()
            .map_err(|e| classify_backend_error(&e.to_string()))?;

        tracing::debug!("Audio stream started");
        Ok(Box::new(MicrophoneHandle {
            _stream: stream,
            sample_rate,
        }))
    }
}

/// Converts one callback's worth of interleaved samples into a mono
/// little-endian PCM fragment, averaging channels.
fn downmix_to_fragment(data: &[i16], num_channels: usize) -> Fragment {
    let mut fragment = Vec::with_capacity((data.len() / num_channels.max(1)) * 2);

    match num_channels {
        0 | 1 => {
            for &sample in data {
                fragment.extend_from_slice(&sample.to_le_bytes());
            }
        }
        _ => {
            for chunk in data.chunks_exact(num_channels) {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                let mono = (sum / num_channels as i32) as i16;
                fragment.extend_from_slice(&mono.to_le_bytes());
            }
        }
    }

    fragment
}

/// Maps a backend error message onto the capture error taxonomy.
fn classify_backend_error(msg: &str) -> CaptureError {
    let lowered = msg.to_lowercase();
    if lowered.contains("permission") || lowered.contains("denied") {
        CaptureError::PermissionDenied
    } else if lowered.contains("not available") || lowered.contains("no device") {
        CaptureError::DeviceUnavailable
    } else {
        CaptureError::Backend(msg.to_string())
    }
}

/// Finds an audio input device by name or numeric index.
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device, CaptureError> {
    let devices: Vec<_> = host
        .input_devices()
        .map_err(|e| classify_backend_error(&e.to_string()))?
        .collect();

    if let Ok(index) = device_spec.parse::<usize>() {
        return devices
            .into_iter()
            .nth(index)
            .ok_or(CaptureError::DeviceUnavailable);
    }

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(CaptureError::DeviceUnavailable)
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// If the redirection itself fails, the closure simply runs with stderr intact.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    let dev_null = match OpenOptions::new().write(true).open("/dev/null") {
        Ok(file) => file,
        Err(_) => return f(),
    };

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return f();
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return f();
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}
