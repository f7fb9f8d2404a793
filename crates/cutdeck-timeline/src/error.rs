//! Errors returned by editing operations.
//!
//! The `Display` text of every variant is a user-facing status message.
//! Out-of-range numbers are never errors; the normalizer clamps them.

use thiserror::Error;

use crate::clip::ClipId;
use crate::track::TrackKind;

/// Why an editing operation left the project unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("Caption text cannot be empty")]
    EmptyCaption,

    #[error("Caption end ({end:.2}s) must be after its start ({start:.2}s)")]
    InvalidCaptionSpan { start: f64, end: f64 },

    #[error("Split point {offset:.2}s must be between {min:.2}s and {max:.2}s into the clip")]
    InvalidSplitOffset { offset: f64, min: f64, max: f64 },

    #[error("Only video and audio clips can be split")]
    SplitTextClip,

    #[error("No {lane} track #{number}", number = .index + 1)]
    TrackNotFound { lane: TrackKind, index: usize },

    #[error("A {lane} track cannot hold this kind of clip")]
    LaneMismatch { lane: TrackKind },

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Asset {asset} has no {lane} stream")]
    MissingStream { asset: String, lane: TrackKind },

    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    #[error("Field `{field}` does not apply to {lane} clips")]
    FieldMismatch { field: &'static str, lane: TrackKind },

    #[error("Add at least one video or text clip before exporting")]
    NothingToExport,
}

/// Result type alias for editing operations.
pub type EditResult<T> = std::result::Result<T, EditError>;
