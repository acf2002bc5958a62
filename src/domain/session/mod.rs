//! Session domain module

mod recording_session;

pub use recording_session::{RecordingSession, SessionError, SessionState};
