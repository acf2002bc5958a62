//! PCM WAV encoder
//!
//! Turns planar `f32` audio into a complete, minimal 16-bit PCM WAV file:
//! the canonical 44-byte header followed by interleaved little-endian
//! samples. The header's size fields always describe exactly the bytes that
//! follow.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use thiserror::Error;

use super::decoded_audio::DecodedAudio;
use super::wav_header::{WavHeader, BYTES_PER_SAMPLE, HEADER_LEN};
use crate::domain::error::InvalidQuantizeModeError;

/// Scale factor from the nominal `[-1.0, 1.0]` range to i16
const FULL_SCALE: f64 = 32767.0;

/// Number of distinct 16-bit values, used for wraparound
const I16_MODULUS: f64 = 65536.0;

/// Encoding errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("Invalid audio input: {0}")]
    InvalidInput(String),

    #[error("Sample {index} is outside [-1.0, 1.0]: {value}")]
    QuantizationOverflow { index: usize, value: f32 },
}

/// How samples outside `[-1.0, 1.0]` are turned into 16-bit integers.
///
/// In every mode the in-range path is identical: `trunc(s * 32767)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantizeMode {
    /// Reduce the truncated value modulo 2^16. Out-of-range input wraps
    /// around silently, e.g. `1.5` becomes `-16386`.
    #[default]
    Wrap,
    /// Saturate to `[-32767, 32767]`. Produces different bytes than `Wrap`
    /// for out-of-range input.
    Clamp,
    /// Refuse to encode when any sample is out of range or not finite.
    Strict,
}

impl QuantizeMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Clamp => "clamp",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for QuantizeMode {
    type Err = InvalidQuantizeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wrap" => Ok(Self::Wrap),
            "clamp" => Ok(Self::Clamp),
            "strict" => Ok(Self::Strict),
            _ => Err(InvalidQuantizeModeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for QuantizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quantize one sample to i16.
///
/// The product is computed in f64 and truncated toward zero, so `1.0` maps
/// to `32767` and `-1.0` to `-32767` (never `-32768`). NaN and infinities
/// become `0`. `Strict` behaves like `Clamp` here; rejection happens in
/// [`encode_wav_with`].
pub fn quantize_sample(sample: f32, mode: QuantizeMode) -> i16 {
    let scaled = f64::from(sample) * FULL_SCALE;
    if !scaled.is_finite() {
        return 0;
    }

    let truncated = scaled.trunc();
    match mode {
        QuantizeMode::Wrap => truncated.rem_euclid(I16_MODULUS) as u16 as i16,
        QuantizeMode::Clamp | QuantizeMode::Strict => {
            truncated.clamp(-FULL_SCALE, FULL_SCALE) as i16
        }
    }
}

/// Interleave channel planes frame by frame: `c0f0 c1f0 ... c0f1 c1f1 ...`.
///
/// All channels must have the same length. [`encode_wav_with`] checks this
/// before calling; other callers must do the same.
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let expected = channels.first().map_or(0, Vec::len);
    debug_assert!(
        channels.iter().all(|c| c.len() == expected),
        "interleave needs equal-length channels"
    );
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for frame in 0..frames {
        for channel in channels {
            out.push(channel[frame]);
        }
    }
    out
}

/// Encode audio as 16-bit PCM WAV using the reference (`Wrap`) quantizer
pub fn encode_wav(audio: &DecodedAudio) -> Result<Vec<u8>, EncodingError> {
    encode_wav_with(audio, QuantizeMode::default())
}

/// Encode audio as 16-bit PCM WAV.
///
/// Fails without producing output when the channel list is empty, channel
/// lengths differ, the sample rate is zero, or a header field would
/// overflow. In `Strict` mode, also fails on the first sample outside
/// `[-1.0, 1.0]`.
pub fn encode_wav_with(audio: &DecodedAudio, mode: QuantizeMode) -> Result<Vec<u8>, EncodingError> {
    let header = validated_header(audio)?;
    let interleaved = interleave(audio.channels());

    if mode == QuantizeMode::Strict {
        if let Some((index, &value)) = interleaved
            .iter()
            .enumerate()
            .find(|(_, s)| !is_in_range(**s))
        {
            return Err(EncodingError::QuantizationOverflow { index, value });
        }
    } else {
        let out_of_range = interleaved.iter().filter(|s| !is_in_range(**s)).count();
        if out_of_range > 0 {
            warn!(
                "{} of {} samples outside [-1.0, 1.0] were quantized in {} mode",
                out_of_range,
                interleaved.len(),
                mode
            );
        }
    }

    let mut out = Vec::with_capacity(HEADER_LEN + header.data_len as usize);
    out.extend_from_slice(&header.to_bytes());
    for &sample in &interleaved {
        out.extend_from_slice(&quantize_sample(sample, mode).to_le_bytes());
    }

    debug!(
        "encoded {} frames x {} channels at {} Hz into {} bytes",
        audio.frame_count(),
        audio.channel_count(),
        audio.sample_rate(),
        out.len()
    );

    Ok(out)
}

fn is_in_range(sample: f32) -> bool {
    (-1.0..=1.0).contains(&sample)
}

/// Check the buffer shape and derive the header for it
fn validated_header(audio: &DecodedAudio) -> Result<WavHeader, EncodingError> {
    if audio.channel_count() == 0 {
        return Err(EncodingError::InvalidInput(
            "audio has no channels".to_string(),
        ));
    }
    if !audio.is_rectangular() {
        let lengths: Vec<usize> = audio.channels().iter().map(Vec::len).collect();
        return Err(EncodingError::InvalidInput(format!(
            "channel lengths differ: {:?}",
            lengths
        )));
    }
    if audio.sample_rate() == 0 {
        return Err(EncodingError::InvalidInput(
            "sample rate must be positive".to_string(),
        ));
    }

    let channels = u16::try_from(audio.channel_count()).map_err(|_| {
        EncodingError::InvalidInput(format!("{} channels do not fit", audio.channel_count()))
    })?;

    let data_len = audio
        .frame_count()
        .checked_mul(audio.channel_count())
        .and_then(|n| n.checked_mul(usize::from(BYTES_PER_SAMPLE)))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            EncodingError::InvalidInput(format!(
                "{} frames x {} channels exceed the 4 GiB WAV limit",
                audio.frame_count(),
                audio.channel_count()
            ))
        })?;

    WavHeader::for_pcm16(channels, audio.sample_rate(), data_len).ok_or_else(|| {
        EncodingError::InvalidInput(format!(
            "{} channels at {} Hz overflow the WAV header fields",
            channels,
            audio.sample_rate()
        ))
    })
}
