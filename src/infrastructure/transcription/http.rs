//! HTTP transcription service adapter
//!
//! Uploads the WAV take as a multipart form and reads back a small JSON
//! object carrying either `transcribed_text` or `error`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::config::DEFAULT_TRANSCRIBE_URL;
use crate::domain::transcription::AudioData;

/// Multipart field carrying the audio
const AUDIO_FIELD: &str = "audio";

/// File name reported for the upload
const UPLOAD_FILE_NAME: &str = "recording.wav";

// Response type for the transcription endpoint

#[derive(Debug, Default, Deserialize)]
struct TranscribeResponse {
    transcribed_text: Option<String>,
    error: Option<String>,
}

/// Transcriber backed by a multipart HTTP endpoint
pub struct HttpTranscriber {
    url: String,
    client: reqwest::Client,
}

impl HttpTranscriber {
    /// Create a transcriber posting to the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint this transcriber posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the multipart form
    fn build_form(audio: &AudioData) -> Result<Form, TranscriptionError> {
        let part = Part::bytes(audio.data().to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        Ok(Form::new().part(AUDIO_FIELD, part))
    }

    /// Map a response body to a transcript or an error
    fn interpret(status: reqwest::StatusCode, body: &str) -> Result<String, TranscriptionError> {
        if !status.is_success() {
            // Servers usually explain themselves in the `error` field
            let message = serde_json::from_str::<TranscribeResponse>(body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body.trim()));
            return Err(TranscriptionError::ApiError(message));
        }

        let response: TranscribeResponse = serde_json::from_str(body)
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        match (response.transcribed_text, response.error) {
            (Some(text), _) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Err(TranscriptionError::EmptyResponse)
                } else {
                    Ok(trimmed.to_string())
                }
            }
            (None, Some(error)) => Err(TranscriptionError::ApiError(error)),
            (None, None) => Err(TranscriptionError::EmptyResponse),
        }
    }
}

impl Default for HttpTranscriber {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIBE_URL)
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        let form = Self::build_form(audio)?;

        log::debug!("uploading {} to {}", audio.human_readable_size(), self.url);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        Self::interpret(status, &body)
    }
}
