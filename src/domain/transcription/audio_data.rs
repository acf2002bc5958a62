//! Audio payload value object

use std::fmt;
use std::path::Path;

/// Audio container types the crate can read or produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Wav,
    Webm,
    Ogg,
    Mp3,
    Mp4,
    Flac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 => "audio/mp4",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Mp4 => "m4a",
            Self::Flac => "flac",
        }
    }

    /// Guess the type from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" | "wave" => Some(Self::Wav),
            "webm" | "mkv" => Some(Self::Webm),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "mp3" => Some(Self::Mp3),
            "mp4" | "m4a" | "aac" => Some(Self::Mp4),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// Guess the type from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::Wav
    }
}

/// Value object holding an encoded audio file and its MIME type.
/// The bytes are opaque to everything but the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioData {
    /// Create AudioData from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Wrap an encoded WAV file
    pub fn wav(data: Vec<u8>) -> Self {
        Self::new(data, AudioMimeType::Wav)
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(AudioMimeType::Wav.as_str(), "audio/wav");
        assert_eq!(AudioMimeType::Webm.as_str(), "audio/webm");
        assert_eq!(AudioMimeType::Ogg.as_str(), "audio/ogg");
    }

    #[test]
    fn from_extension_is_case_insensitive() {
        assert_eq!(AudioMimeType::from_extension("WEBM"), Some(AudioMimeType::Webm));
        assert_eq!(AudioMimeType::from_extension("wav"), Some(AudioMimeType::Wav));
        assert_eq!(AudioMimeType::from_extension("m4a"), Some(AudioMimeType::Mp4));
        assert_eq!(AudioMimeType::from_extension("txt"), None);
    }

    #[test]
    fn from_path_uses_extension() {
        let path = Path::new("/tmp/clip.ogg");
        assert_eq!(AudioMimeType::from_path(path), Some(AudioMimeType::Ogg));
        assert_eq!(AudioMimeType::from_path(Path::new("noext")), None);
    }

    #[test]
    fn audio_data_size() {
        let data = AudioData::wav(vec![0u8; 1024]);
        assert_eq!(data.size_bytes(), 1024);
        assert_eq!(data.mime_type(), AudioMimeType::Wav);
    }

    #[test]
    fn human_readable_size_bytes() {
        let data = AudioData::wav(vec![0u8; 500]);
        assert_eq!(data.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let data = AudioData::wav(vec![0u8; 2048]);
        assert_eq!(data.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let data = AudioData::wav(vec![0u8; 2 * 1024 * 1024]);
        assert_eq!(data.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn into_data_returns_bytes() {
        let data = AudioData::new(vec![1, 2, 3, 4], AudioMimeType::Webm);
        assert_eq!(data.into_data(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn default_mime_type_is_wav() {
        assert_eq!(AudioMimeType::default(), AudioMimeType::Wav);
    }
}
