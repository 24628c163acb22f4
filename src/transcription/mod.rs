//! Transcription service integration: the HTTP client for the multipart
//! exchange and the orchestrator managing the request slot.

pub mod client;
pub mod orchestrator;

pub use client::{TranscribeError, TranscriptionClient};
pub use orchestrator::{RequestState, TranscriptionOrchestrator};
