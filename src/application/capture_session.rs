//! Capture session use case
//!
//! Owns the microphone port and the explicit [`RecordingSession`] state, so
//! "is something recording" and "which take gets uploaded" live in one
//! place instead of being spread across callers.

use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::audio::QuantizeMode;
use crate::domain::session::{RecordingSession, SessionError, SessionState};
use crate::domain::transcription::AudioData;

use super::convert::{encode_in_background, ConvertError};
use super::ports::{AudioCapture, CaptureError};

/// Errors from the capture session
#[derive(Debug, Error)]
pub enum CaptureSessionError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Record-then-upload session around a capture device
pub struct CaptureSession<C>
where
    C: AudioCapture,
{
    capture: C,
    session: Mutex<RecordingSession>,
    mode: QuantizeMode,
}

impl<C> CaptureSession<C>
where
    C: AudioCapture,
{
    /// Create an idle session
    pub fn new(capture: C, mode: QuantizeMode) -> Self {
        Self {
            capture,
            session: Mutex::new(RecordingSession::new()),
            mode,
        }
    }

    /// Current session state
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Elapsed capture time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.capture.elapsed_ms()
    }

    /// Start a new take, discarding any previous one
    pub async fn start(&self) -> Result<(), CaptureSessionError> {
        let mut session = self.session.lock().await;
        session.start_recording()?;

        if let Err(e) = self.capture.start().await {
            session.cancel_recording()?;
            return Err(e.into());
        }
        Ok(())
    }

    /// Stop the take and encode it to WAV. The take stays in the session
    /// until the next `start`.
    pub async fn stop(&self) -> Result<AudioData, CaptureSessionError> {
        let mut session = self.session.lock().await;
        if !session.is_recording() {
            return Err(SessionError::InvalidTransition {
                current_state: session.state(),
                action: "stop recording",
            }
            .into());
        }

        let decoded = match self.capture.stop().await {
            Ok(decoded) => decoded,
            Err(e) => {
                session.cancel_recording()?;
                return Err(e.into());
            }
        };

        log::info!(
            "captured {} ms: {} channel(s) at {} Hz",
            decoded.duration_ms(),
            decoded.channel_count(),
            decoded.sample_rate()
        );

        let wav = match encode_in_background(decoded, self.mode).await {
            Ok(wav) => wav,
            Err(e) => {
                session.cancel_recording()?;
                return Err(e.into());
            }
        };

        session.finish_recording(wav.clone())?;
        Ok(wav)
    }

    /// Abort the take without keeping audio
    pub async fn cancel(&self) -> Result<(), CaptureSessionError> {
        let mut session = self.session.lock().await;
        session.cancel_recording()?;
        self.capture.cancel().await?;
        Ok(())
    }

    /// Mark the stored take as being uploaded and return it
    pub async fn begin_upload(&self) -> Result<AudioData, CaptureSessionError> {
        Ok(self.session.lock().await.begin_upload()?)
    }

    /// Mark the upload as finished; the take can be sent again
    pub async fn complete_upload(&self) -> Result<(), CaptureSessionError> {
        Ok(self.session.lock().await.complete_upload()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::DecodedAudio;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MockCapture {
        recording: AtomicBool,
        fail_start: bool,
        audio: DecodedAudio,
    }

    impl MockCapture {
        fn with_audio(audio: DecodedAudio) -> Self {
            Self {
                recording: AtomicBool::new(false),
                fail_start: false,
                audio,
            }
        }
    }

    #[async_trait]
    impl AudioCapture for MockCapture {
        async fn start(&self) -> Result<(), CaptureError> {
            if self.fail_start {
                return Err(CaptureError::NoAudioDevice);
            }
            self.recording.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<DecodedAudio, CaptureError> {
            if !self.recording.swap(false, Ordering::SeqCst) {
                return Err(CaptureError::NotRecording);
            }
            Ok(self.audio.clone())
        }

        async fn cancel(&self) -> Result<(), CaptureError> {
            self.recording.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_recording(&self) -> bool {
            self.recording.load(Ordering::SeqCst)
        }

        fn elapsed_ms(&self) -> u64 {
            0
        }
    }

    #[tokio::test]
    async fn start_stop_produces_wav_take() {
        let capture = MockCapture::with_audio(DecodedAudio::new(48000, vec![vec![0.0; 480]; 2]));
        let session = CaptureSession::new(capture, QuantizeMode::Wrap);

        session.start().await.unwrap();
        assert_eq!(session.state().await, SessionState::Recording);

        let wav = session.stop().await.unwrap();
        assert_eq!(wav.size_bytes(), 44 + 480 * 2 * 2);
        assert_eq!(session.state().await, SessionState::Ready);

        let upload = session.begin_upload().await.unwrap();
        assert_eq!(upload, wav);
        session.complete_upload().await.unwrap();
        assert_eq!(session.state().await, SessionState::Ready);
    }

    #[tokio::test]
    async fn upload_before_recording_fails() {
        let capture = MockCapture::with_audio(DecodedAudio::mono(8000, vec![]));
        let session = CaptureSession::new(capture, QuantizeMode::Wrap);

        let err = session.begin_upload().await.unwrap_err();
        assert!(matches!(
            err,
            CaptureSessionError::Session(SessionError::NoRecording)
        ));
    }

    #[tokio::test]
    async fn failed_start_leaves_session_idle() {
        let mut capture = MockCapture::with_audio(DecodedAudio::mono(8000, vec![0.0]));
        capture.fail_start = true;
        let session = CaptureSession::new(capture, QuantizeMode::Wrap);

        let err = session.start().await.unwrap_err();
        assert!(matches!(
            err,
            CaptureSessionError::Capture(CaptureError::NoAudioDevice)
        ));
        assert_eq!(session.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn stop_without_start_fails() {
        let capture = MockCapture::with_audio(DecodedAudio::mono(8000, vec![0.0]));
        let session = CaptureSession::new(capture, QuantizeMode::Wrap);

        assert!(matches!(
            session.stop().await,
            Err(CaptureSessionError::Session(_))
        ));
    }

    #[tokio::test]
    async fn strict_encoding_failure_discards_take() {
        let capture = MockCapture::with_audio(DecodedAudio::mono(8000, vec![1.5]));
        let session = CaptureSession::new(capture, QuantizeMode::Strict);

        session.start().await.unwrap();
        assert!(matches!(
            session.stop().await,
            Err(CaptureSessionError::Convert(_))
        ));
        assert_eq!(session.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn cancel_discards_take() {
        let capture = MockCapture::with_audio(DecodedAudio::mono(8000, vec![0.0]));
        let session = CaptureSession::new(capture, QuantizeMode::Wrap);

        session.start().await.unwrap();
        session.cancel().await.unwrap();
        assert_eq!(session.state().await, SessionState::Idle);
        assert!(session.begin_upload().await.is_err());
    }
}
