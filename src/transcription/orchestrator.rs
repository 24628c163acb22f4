//! Transcription request orchestration.
//!
//! One mutable request slot per orchestrator: each `transcribe` call bumps a
//! generation counter, marks the slot pending, performs the exchange, and
//! applies the outcome only if its generation is still current. A `clear`
//! (or a newer call) that lands while a request is in flight supersedes it,
//! and the stale resolution is discarded when it arrives.

use std::sync::{Arc, Mutex};

use crate::capture::{wav, AudioBuffer};

use super::client::{TranscribeError, TranscriptionClient};

/// Observable state of the request slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// No request issued since the last clear
    Idle,
    /// A request is in flight
    Pending,
    /// The most recent request resolved with text
    Succeeded(String),
    /// The most recent request resolved with an error
    Failed(TranscribeError),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

struct RequestSlot {
    generation: u64,
    state: RequestState,
}

/// Submits finalized buffers to the transcription service and tracks the
/// current request's state.
#[derive(Clone)]
pub struct TranscriptionOrchestrator {
    client: Arc<TranscriptionClient>,
    slot: Arc<Mutex<RequestSlot>>,
}

impl TranscriptionOrchestrator {
    pub fn new(client: TranscriptionClient) -> Self {
        Self {
            client: Arc::new(client),
            slot: Arc::new(Mutex::new(RequestSlot {
                generation: 0,
                state: RequestState::Idle,
            })),
        }
    }

    /// Submits the buffer and returns the slot state after resolution.
    ///
    /// With no buffer, or an empty one, this is a no-op: no request is sent
    /// and the current state is returned unchanged. Each call is a wholly
    /// new attempt; the previous result is discarded up front.
    pub async fn transcribe(&self, buffer: Option<&AudioBuffer>) -> RequestState {
        let Some(buffer) = buffer else {
            return self.state();
        };
        if buffer.is_empty() {
            tracing::debug!("Skipping transcription of empty buffer");
            return self.state();
        }

        let wav_bytes = match wav::wrap_pcm(buffer) {
            Ok(bytes) => bytes,
            Err(e) => {
                let failed =
                    RequestState::Failed(TranscribeError::Network(format!(
                        "Failed to prepare audio for upload: {e}"
                    )));
                let mut slot = self.slot.lock().unwrap();
                slot.generation += 1;
                slot.state = failed.clone();
                return failed;
            }
        };

        let generation = {
            let mut slot = self.slot.lock().unwrap();
            slot.generation += 1;
            slot.state = RequestState::Pending;
            slot.generation
        };

        tracing::info!(
            "Transcribing {} byte buffer (request #{generation})",
            buffer.len()
        );

        let result = self
            .client
            .transcribe(wav_bytes, "recording.wav", "audio/wav")
            .await;

        let mut slot = self.slot.lock().unwrap();
        if slot.generation == generation {
            slot.state = match result {
                Ok(text) => RequestState::Succeeded(text),
                Err(e) => RequestState::Failed(e),
            };
        } else {
            tracing::debug!("Discarding stale resolution for request #{generation}");
        }
        slot.state.clone()
    }

    /// Invalidates any in-flight request and resets the slot to idle.
    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap();
        slot.generation += 1;
        slot.state = RequestState::Idle;
    }

    pub fn state(&self) -> RequestState {
        self.slot.lock().unwrap().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }
}
