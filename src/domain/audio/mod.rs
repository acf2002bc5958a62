//! Audio domain module: decoded sample buffers and the PCM WAV container

mod decoded_audio;
mod wav_encoder;
mod wav_header;

pub use decoded_audio::{DecodedAudio, DeinterleaveError};
pub use wav_encoder::{
    encode_wav, encode_wav_with, interleave, quantize_sample, EncodingError, QuantizeMode,
};
pub use wav_header::{HeaderParseError, WavHeader, BITS_PER_SAMPLE, HEADER_LEN};
