//! Audio error types.

use thiserror::Error;

/// Failure while turning asset bytes into waveform peaks.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The container or codec is not recognised.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error from Symphonia.
    #[error("Decode error: {0}")]
    Decode(String),

    /// No audio track found in the container.
    #[error("No audio track found")]
    NoAudioTrack,

    /// The stream decoded to zero samples.
    #[error("Audio stream is empty")]
    Empty,
}
