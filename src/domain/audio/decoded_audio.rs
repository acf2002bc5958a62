//! Decoded audio value object

use thiserror::Error;

/// Error when an interleaved buffer cannot be split into channels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeinterleaveError {
    #[error("channel count must be at least 1")]
    NoChannels,

    #[error("{samples} samples cannot be split evenly into {channels} channels")]
    RaggedFrames { samples: usize, channels: usize },
}

/// Fully materialized, planar floating point audio.
///
/// Samples are nominally in `[-1.0, 1.0]`. The shape is not checked on
/// construction: the WAV encoder validates it before producing any output,
/// so a buffer handed over by a decoder or capture device is stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Create a buffer from per-channel sample arrays
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Create a single-channel buffer
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self::new(sample_rate, vec![samples])
    }

    /// Split an interleaved buffer (`L R L R ...`) into channel planes
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        samples: &[f32],
    ) -> Result<Self, DeinterleaveError> {
        if channel_count == 0 {
            return Err(DeinterleaveError::NoChannels);
        }
        if samples.len() % channel_count != 0 {
            return Err(DeinterleaveError::RaggedFrames {
                samples: samples.len(),
                channels: channel_count,
            });
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (plane, &sample) in channels.iter_mut().zip(frame) {
                plane.push(sample);
            }
        }

        Ok(Self::new(sample_rate, channels))
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames, taken from the first channel
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Samples of one channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channel planes
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Whether every channel holds the same number of frames
    pub fn is_rectangular(&self) -> bool {
        let frames = self.frame_count();
        self.channels.iter().all(|c| c.len() == frames)
    }

    /// Playback length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frame_count() as u64 * 1000 / u64::from(self.sample_rate)
    }
}
