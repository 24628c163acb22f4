//! HTTP client for the transcription service.
//!
//! One call is exactly one multipart POST. The service replies with
//! `{"success": true, "text": ...}` or `{"success": false, "error": ...}`;
//! any other shape, and any transport failure, is reported as a network
//! error so the caller can tell "the service rejected this" apart from
//! "the request never completed".

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Failure modes of one transcription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscribeError {
    /// The service processed the request and explicitly rejected it;
    /// carries the service-provided message verbatim.
    Service(String),
    /// The exchange never completed cleanly: transport failure or a
    /// response the service contract doesn't cover.
    Network(String),
}

impl fmt::Display for TranscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(msg) => write!(f, "{msg}"),
            Self::Network(msg) => write!(f, "Network error: {msg}"),
        }
    }
}

impl std::error::Error for TranscribeError {}

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    success: bool,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for one configured transcription endpoint.
pub struct TranscriptionClient {
    endpoint: String,
    client: reqwest::Client,
}

impl TranscriptionClient {
    /// # Errors
    /// - If the underlying HTTP client cannot be constructed
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submits one audio payload and returns the transcribed text.
    ///
    /// # Errors
    /// - `Service` when the service replies `success: false`
    /// - `Network` for transport failures and malformed responses
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<String, TranscribeError> {
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| {
                TranscribeError::Network(format!("Failed to create file part for upload: {e}"))
            })?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        tracing::debug!(
            "Transcription request: POST {} ({} as {})",
            self.endpoint,
            file_name,
            mime
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let msg = if e.is_connect() {
                    "Failed to connect to the transcription service. Check your internet connection.".to_string()
                } else if e.is_timeout() {
                    "Request to the transcription service timed out.".to_string()
                } else {
                    format!("Transcription request failed: {e}")
                };
                TranscribeError::Network(msg)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TranscribeError::Network(format!("Failed to read service response: {e}"))
        })?;

        parse_response(status.as_u16(), &body)
    }
}

/// Maps a raw service response onto text-or-error.
///
/// The HTTP status is ignored for classification: the contract is carried in
/// the JSON body, and a body that doesn't match it is a network-level
/// failure regardless of status.
fn parse_response(status: u16, body: &str) -> Result<String, TranscribeError> {
    let parsed: ServiceResponse = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Unparseable service response (status {status}): {e}");
        TranscribeError::Network(
            "The transcription service returned an unrecognized response.".to_string(),
        )
    })?;

    if parsed.success {
        match parsed.text {
            Some(text) => {
                tracing::debug!("Transcription succeeded: {} characters", text.len());
                Ok(text.trim().to_string())
            }
            None => Err(TranscribeError::Network(
                "The transcription service returned an unrecognized response.".to_string(),
            )),
        }
    } else {
        let message = parsed
            .error
            .unwrap_or_else(|| "Failed to transcribe audio".to_string());
        tracing::info!("Service rejected transcription: {message}");
        Err(TranscribeError::Service(message))
    }
}
