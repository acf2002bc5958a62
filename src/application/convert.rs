//! Convert-to-WAV use case

use thiserror::Error;

use crate::domain::audio::{encode_wav_with, DecodedAudio, EncodingError, QuantizeMode};
use crate::domain::transcription::{AudioData, AudioMimeType};

use super::ports::{AudioDecoder, DecodeError};

/// Errors from the conversion use case
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Encoder task failed: {0}")]
    Task(String),
}

/// Where the audio to convert comes from
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// An encoded file of any type the decoder understands
    Compressed(AudioData),
    /// Samples already in memory (e.g. straight from the microphone)
    Decoded(DecodedAudio),
}

/// Decodes (when needed) and re-encodes audio as 16-bit PCM WAV
pub struct WavConverter<D>
where
    D: AudioDecoder,
{
    decoder: D,
    mode: QuantizeMode,
}

impl<D> WavConverter<D>
where
    D: AudioDecoder,
{
    /// Create a converter using the given quantize mode
    pub fn new(decoder: D, mode: QuantizeMode) -> Self {
        Self { decoder, mode }
    }

    /// The quantize mode applied to every conversion
    pub fn mode(&self) -> QuantizeMode {
        self.mode
    }

    /// Produce a WAV payload from any source.
    ///
    /// Compressed WAV input is decoded and re-encoded as well, so the
    /// output is always the canonical 44-byte-header layout.
    pub async fn convert(&self, source: AudioSource) -> Result<AudioData, ConvertError> {
        let decoded = match source {
            AudioSource::Compressed(audio) => {
                log::debug!(
                    "decoding {} ({})",
                    audio.mime_type(),
                    audio.human_readable_size()
                );
                self.decoder.decode(&audio).await?
            }
            AudioSource::Decoded(decoded) => decoded,
        };

        encode_in_background(decoded, self.mode).await
    }
}

/// Run the encoder off the async runtime's worker threads
pub async fn encode_in_background(
    audio: DecodedAudio,
    mode: QuantizeMode,
) -> Result<AudioData, ConvertError> {
    let bytes = tokio::task::spawn_blocking(move || encode_wav_with(&audio, mode))
        .await
        .map_err(|e| ConvertError::Task(e.to_string()))??;

    Ok(AudioData::new(bytes, AudioMimeType::Wav))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubDecoder(Result<DecodedAudio, DecodeError>);

    #[async_trait]
    impl AudioDecoder for StubDecoder {
        async fn decode(&self, _audio: &AudioData) -> Result<DecodedAudio, DecodeError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn convert_compressed_source() {
        let decoded = DecodedAudio::mono(16000, vec![0.0, 0.5, -0.5]);
        let converter = WavConverter::new(StubDecoder(Ok(decoded)), QuantizeMode::Wrap);

        let source = AudioSource::Compressed(AudioData::new(vec![1, 2, 3], AudioMimeType::Webm));
        let wav = converter.convert(source).await.unwrap();

        assert_eq!(wav.mime_type(), AudioMimeType::Wav);
        assert_eq!(wav.size_bytes(), 50);
    }

    #[tokio::test]
    async fn convert_decoded_source_skips_decoder() {
        let converter = WavConverter::new(StubDecoder(Err(DecodeError::NoTrack)), QuantizeMode::Wrap);
        let source = AudioSource::Decoded(DecodedAudio::new(8000, vec![vec![0.1; 4], vec![0.2; 4]]));

        let wav = converter.convert(source).await.unwrap();
        assert_eq!(wav.size_bytes(), 44 + 4 * 2 * 2);
    }

    #[tokio::test]
    async fn decoder_errors_propagate() {
        let converter = WavConverter::new(StubDecoder(Err(DecodeError::Empty)), QuantizeMode::Wrap);
        let source = AudioSource::Compressed(AudioData::new(vec![0], AudioMimeType::Ogg));

        let err = converter.convert(source).await.unwrap_err();
        assert!(matches!(err, ConvertError::Decode(DecodeError::Empty)));
    }

    #[tokio::test]
    async fn invalid_shape_is_an_encoding_error() {
        let converter = WavConverter::new(StubDecoder(Err(DecodeError::NoTrack)), QuantizeMode::Wrap);
        let source = AudioSource::Decoded(DecodedAudio::new(8000, vec![vec![0.0; 2], vec![0.0]]));

        let err = converter.convert(source).await.unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Encoding(EncodingError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn strict_mode_is_applied() {
        let decoded = DecodedAudio::mono(8000, vec![2.0]);
        let converter = WavConverter::new(StubDecoder(Ok(decoded)), QuantizeMode::Strict);
        let source = AudioSource::Compressed(AudioData::new(vec![0], AudioMimeType::Mp3));

        let err = converter.convert(source).await.unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Encoding(EncodingError::QuantizationOverflow { index: 0, .. })
        ));
    }
}
