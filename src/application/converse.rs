//! Converse use case: audio in, transcript and persona reply out

use thiserror::Error;

use crate::domain::transcription::AudioData;

use super::convert::{AudioSource, ConvertError, WavConverter};
use super::ports::{AudioDecoder, Responder, ResponderError, Transcriber, TranscriptionError};

/// Errors from the converse use case
#[derive(Debug, Error)]
pub enum ConverseError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Response failed: {0}")]
    Responder(#[from] ResponderError),
}

/// Input for one conversational turn
#[derive(Debug, Clone)]
pub enum ConverseInput {
    /// Audio that still has to be turned into WAV
    Source(AudioSource),
    /// An already-encoded WAV take, uploaded unchanged
    Wav(AudioData),
}

/// Output from the converse use case
#[derive(Debug, Clone)]
pub struct ConverseOutput {
    /// What the transcription service heard
    pub transcript: String,
    /// The persona's answer
    pub reply: String,
    /// Uploaded WAV size in human-readable format
    pub audio_size: String,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct ConverseCallbacks {
    /// Called once the WAV payload is ready, with its size
    pub on_encoded: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when the upload starts
    pub on_uploading_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called when the transcript arrives
    pub on_transcribed: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

/// One conversational turn: convert, upload, answer
pub struct ConverseUseCase<D, T, R>
where
    D: AudioDecoder,
    T: Transcriber,
    R: Responder,
{
    converter: WavConverter<D>,
    transcriber: T,
    responder: R,
}

impl<D, T, R> ConverseUseCase<D, T, R>
where
    D: AudioDecoder,
    T: Transcriber,
    R: Responder,
{
    /// Create a new use case instance
    pub fn new(converter: WavConverter<D>, transcriber: T, responder: R) -> Self {
        Self {
            converter,
            transcriber,
            responder,
        }
    }

    /// Execute the turn
    pub async fn execute(
        &self,
        input: ConverseInput,
        callbacks: ConverseCallbacks,
    ) -> Result<ConverseOutput, ConverseError> {
        let wav = match input {
            ConverseInput::Source(source) => self.converter.convert(source).await?,
            ConverseInput::Wav(wav) => wav,
        };

        let audio_size = wav.human_readable_size();
        if let Some(ref cb) = callbacks.on_encoded {
            cb(&audio_size);
        }

        if let Some(ref cb) = callbacks.on_uploading_start {
            cb();
        }

        let transcript = self.transcriber.transcribe(&wav).await?;
        log::info!("transcribed {} into {} chars", audio_size, transcript.len());

        if let Some(ref cb) = callbacks.on_transcribed {
            cb(&transcript);
        }

        let reply = self.responder.respond(&transcript).await?;

        Ok(ConverseOutput {
            transcript,
            reply,
            audio_size,
        })
    }
}
