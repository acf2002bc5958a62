//! Recording session state machine

use std::fmt;
use thiserror::Error;

use crate::domain::transcription::AudioData;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Ready,
    Uploading,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Ready => "ready",
            Self::Uploading => "uploading",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from session transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid state transition: cannot {action} while in {current_state} state")]
    InvalidTransition {
        current_state: SessionState,
        action: &'static str,
    },

    #[error("No recording to upload.")]
    NoRecording,
}

/// One user's capture-and-upload session.
///
/// State machine:
///   IDLE | READY -> RECORDING (start_recording, drops any previous take)
///   RECORDING -> READY (finish_recording)
///   RECORDING -> IDLE (cancel_recording)
///   READY -> UPLOADING (begin_upload)
///   UPLOADING -> READY (complete_upload, the take is kept for re-sending)
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: SessionState,
    recording: Option<AudioData>,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// The last finished recording, if any
    pub fn recording(&self) -> Option<&AudioData> {
        self.recording.as_ref()
    }

    /// Transition to RECORDING
    pub fn start_recording(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle | SessionState::Ready => {
                self.recording = None;
                self.state = SessionState::Recording;
                Ok(())
            }
            current_state => Err(SessionError::InvalidTransition {
                current_state,
                action: "start recording",
            }),
        }
    }

    /// Transition from RECORDING to READY, storing the encoded take
    pub fn finish_recording(&mut self, audio: AudioData) -> Result<(), SessionError> {
        self.expect(SessionState::Recording, "finish recording")?;
        self.recording = Some(audio);
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Transition from RECORDING to IDLE without keeping audio
    pub fn cancel_recording(&mut self) -> Result<(), SessionError> {
        self.expect(SessionState::Recording, "cancel recording")?;
        self.recording = None;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Transition from READY to UPLOADING and hand out the take to send
    pub fn begin_upload(&mut self) -> Result<AudioData, SessionError> {
        if self.state != SessionState::Ready {
            if self.recording.is_none() && self.state == SessionState::Idle {
                return Err(SessionError::NoRecording);
            }
            return Err(SessionError::InvalidTransition {
                current_state: self.state,
                action: "upload",
            });
        }
        let audio = self.recording.clone().ok_or(SessionError::NoRecording)?;
        self.state = SessionState::Uploading;
        Ok(audio)
    }

    /// Transition from UPLOADING back to READY
    pub fn complete_upload(&mut self) -> Result<(), SessionError> {
        self.expect(SessionState::Uploading, "complete upload")?;
        self.state = SessionState::Ready;
        Ok(())
    }

    fn expect(&self, state: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state != state {
            return Err(SessionError::InvalidTransition {
                current_state: self.state,
                action,
            });
        }
        Ok(())
    }
}
