//! Canonical 44-byte RIFF/WAVE header for 16-bit linear PCM

use thiserror::Error;

/// Size of the canonical header in bytes
pub const HEADER_LEN: usize = 44;

/// Bits per quantized sample
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per quantized sample
pub const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;

/// `fmt ` chunk body size for plain PCM
const FMT_CHUNK_SIZE: u32 = 16;

/// WAVE_FORMAT_PCM
const FORMAT_PCM: u16 = 1;

/// Bytes between the end of the RIFF size field and the first sample
const RIFF_OVERHEAD: u32 = (HEADER_LEN - 8) as u32;

/// Error when a byte slice does not hold a canonical PCM header
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    #[error("header too short: {0} bytes (need 44)")]
    TooShort(usize),

    #[error("missing \"{expected}\" marker at offset {offset}")]
    BadMarker { offset: usize, expected: &'static str },

    #[error("unsupported fmt chunk: size {chunk_size}, format {format}, {bits} bits")]
    Unsupported {
        chunk_size: u32,
        format: u16,
        bits: u16,
    },
}

/// Parsed or to-be-written header fields.
///
/// Only the fields that vary are stored; markers, the `fmt ` size, the
/// format tag and the bit depth are fixed for this container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub data_len: u32,
    pub riff_len: u32,
}

impl WavHeader {
    /// Build a header whose derived fields are consistent with the inputs.
    ///
    /// Returns `None` when byte rate or chunk size overflow 32 bits, or when
    /// the block alignment overflows 16 bits.
    pub fn for_pcm16(channels: u16, sample_rate: u32, data_len: u32) -> Option<Self> {
        let block_align = channels.checked_mul(BYTES_PER_SAMPLE)?;
        let byte_rate = sample_rate.checked_mul(u32::from(block_align))?;
        let riff_len = data_len.checked_add(RIFF_OVERHEAD)?;
        Some(Self {
            channels,
            sample_rate,
            byte_rate,
            block_align,
            data_len,
            riff_len,
        })
    }

    /// Serialize to the canonical little-endian layout
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.riff_len.to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        out[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
        out[22..24].copy_from_slice(&self.channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        out[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_len.to_le_bytes());
        out
    }

    /// Parse the first 44 bytes of a canonical 16-bit PCM file
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderParseError> {
        if bytes.len() < HEADER_LEN {
            return Err(HeaderParseError::TooShort(bytes.len()));
        }

        expect_marker(bytes, 0, "RIFF")?;
        expect_marker(bytes, 8, "WAVE")?;
        expect_marker(bytes, 12, "fmt ")?;
        expect_marker(bytes, 36, "data")?;

        let chunk_size = read_u32(bytes, 16);
        let format = read_u16(bytes, 20);
        let bits = read_u16(bytes, 34);
        if chunk_size != FMT_CHUNK_SIZE || format != FORMAT_PCM || bits != BITS_PER_SAMPLE {
            return Err(HeaderParseError::Unsupported {
                chunk_size,
                format,
                bits,
            });
        }

        Ok(Self {
            riff_len: read_u32(bytes, 4),
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            data_len: read_u32(bytes, 40),
        })
    }

    /// Number of frames described by the data chunk
    pub fn frame_count(&self) -> u32 {
        if self.block_align == 0 {
            return 0;
        }
        self.data_len / u32::from(self.block_align)
    }

    /// Check the declared sizes against a complete file length and against
    /// each other. Returns a description of every mismatch found.
    pub fn size_mismatches(&self, file_len: usize) -> Vec<String> {
        let mut problems = Vec::new();

        if u64::from(self.riff_len) != u64::from(self.data_len) + u64::from(RIFF_OVERHEAD) {
            problems.push(format!(
                "chunk size {} != 36 + data size {}",
                self.riff_len, self.data_len
            ));
        }
        if HEADER_LEN as u64 + u64::from(self.data_len) != file_len as u64 {
            problems.push(format!(
                "data size {} does not match {} bytes after the header",
                self.data_len,
                file_len.saturating_sub(HEADER_LEN)
            ));
        }
        if self.block_align != self.channels.wrapping_mul(BYTES_PER_SAMPLE) {
            problems.push(format!(
                "block align {} != channels {} x 2",
                self.block_align, self.channels
            ));
        }
        if u64::from(self.byte_rate) != u64::from(self.sample_rate) * u64::from(self.block_align)
        {
            problems.push(format!(
                "byte rate {} != sample rate {} x block align {}",
                self.byte_rate, self.sample_rate, self.block_align
            ));
        }

        problems
    }
}

fn expect_marker(
    bytes: &[u8],
    offset: usize,
    expected: &'static str,
) -> Result<(), HeaderParseError> {
    if &bytes[offset..offset + 4] == expected.as_bytes() {
        Ok(())
    } else {
        Err(HeaderParseError::BadMarker { offset, expected })
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
