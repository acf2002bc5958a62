//! Symphonia-based decoder adapter
//!
//! Decodes a whole in-memory file to planar f32, keeping the source rate
//! and channel layout. The WAV encoder does the rest.

use std::io::Cursor;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoder, DecodeError};
use crate::domain::audio::DecodedAudio;
use crate::domain::transcription::AudioData;

/// Decoder backed by symphonia's default codec registry
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Blocking decode of a complete file
    pub fn decode_blocking(audio: &AudioData) -> Result<DecodedAudio, DecodeError> {
        let cursor = Cursor::new(audio.data().to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(audio.mime_type().extension());
        hint.mime_type(audio.mime_type().as_str());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoTrack)?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

        let mut planes: Vec<Vec<f32>> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(DecodeError::Decode(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                // Corrupt packet: skip it, the rest of the stream may be fine
                Err(SymphoniaError::DecodeError(e)) => {
                    log::warn!("skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(DecodeError::Decode(e.to_string())),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            if channels == 0 {
                continue;
            }
            sample_rate.get_or_insert(spec.rate);
            if planes.is_empty() {
                planes = vec![Vec::new(); channels];
            }

            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buffer.copy_interleaved_ref(decoded);
            for frame in buffer.samples().chunks_exact(channels) {
                for (plane, &sample) in planes.iter_mut().zip(frame) {
                    plane.push(sample);
                }
            }
        }

        let sample_rate = sample_rate
            .ok_or_else(|| DecodeError::Decode("stream does not declare a sample rate".into()))?;
        let audio = DecodedAudio::new(sample_rate, planes);
        if audio.frame_count() == 0 {
            return Err(DecodeError::Empty);
        }

        log::debug!(
            "decoded {} frames, {} channel(s) at {} Hz",
            audio.frame_count(),
            audio.channel_count(),
            audio.sample_rate()
        );

        Ok(audio)
    }
}

#[async_trait]
impl AudioDecoder for SymphoniaDecoder {
    async fn decode(&self, audio: &AudioData) -> Result<DecodedAudio, DecodeError> {
        let audio = audio.clone();
        tokio::task::spawn_blocking(move || Self::decode_blocking(&audio))
            .await
            .map_err(|e| DecodeError::Decode(format!("Decode task error: {}", e)))?
    }
}
