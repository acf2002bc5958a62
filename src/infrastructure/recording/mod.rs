//! Recording infrastructure module
//!
//! Microphone capture through cpal at the device's native format.

mod cpal_capture;

pub use cpal_capture::CpalCapture;

/// Create the default capture adapter for the current platform
pub fn create_capture() -> CpalCapture {
    CpalCapture::new()
}
