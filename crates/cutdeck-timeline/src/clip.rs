//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::track::TrackKind;

/// Session-unique clip identifier (`clip-N`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A video or audio placement referencing an uploaded asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaClip {
    pub id: ClipId,
    /// Referenced asset identifier.
    pub asset_id: String,
    /// Timeline position in seconds.
    pub start: f64,
    /// Offset into the asset's source material.
    pub in_point: f64,
    /// Length on the timeline in seconds.
    pub duration: f64,
    /// Fade-in length, at most half the duration.
    pub transition_in: f64,
    /// Fade-out length, at most half the duration.
    pub transition_out: f64,
    /// Gain, 1.0 = unity.
    pub volume: f64,
}

impl MediaClip {
    /// Timeline end time.
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Source out point.
    #[inline]
    pub fn source_out(&self) -> f64 {
        self.in_point + self.duration
    }
}

/// A caption overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClip {
    pub id: ClipId,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub font_size: u32,
    pub color: String,
    /// Overlay position in output pixels.
    pub x: f64,
    pub y: f64,
}

impl TextClip {
    pub const DEFAULT_FONT_SIZE: u32 = 42;
    pub const DEFAULT_COLOR: &'static str = "white";
    pub const DEFAULT_X: f64 = 40.0;
    pub const DEFAULT_Y: f64 = 640.0;

    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A clip on the timeline, polymorphic over lane kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Clip {
    Media(MediaClip),
    Text(TextClip),
}

impl Clip {
    pub fn id(&self) -> &ClipId {
        match self {
            Clip::Media(clip) => &clip.id,
            Clip::Text(clip) => &clip.id,
        }
    }

    pub fn start(&self) -> f64 {
        match self {
            Clip::Media(clip) => clip.start,
            Clip::Text(clip) => clip.start,
        }
    }

    /// Duration on the timeline (derived for text clips).
    pub fn duration(&self) -> f64 {
        match self {
            Clip::Media(clip) => clip.duration,
            Clip::Text(clip) => clip.duration(),
        }
    }

    pub fn end(&self) -> f64 {
        match self {
            Clip::Media(clip) => clip.end(),
            Clip::Text(clip) => clip.end,
        }
    }

    /// Whether this clip can live on a track of `kind`.
    pub fn fits(&self, kind: TrackKind) -> bool {
        match self {
            Clip::Media(_) => kind.is_media(),
            Clip::Text(_) => kind == TrackKind::Text,
        }
    }

    pub fn as_media(&self) -> Option<&MediaClip> {
        match self {
            Clip::Media(clip) => Some(clip),
            Clip::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextClip> {
        match self {
            Clip::Text(clip) => Some(clip),
            Clip::Media(_) => None,
        }
    }

    /// Label shown on the clip box.
    pub fn label(&self) -> &str {
        match self {
            Clip::Media(clip) => &clip.asset_id,
            Clip::Text(clip) => &clip.text,
        }
    }
}

impl From<MediaClip> for Clip {
    fn from(clip: MediaClip) -> Self {
        Clip::Media(clip)
    }
}

impl From<TextClip> for Clip {
    fn from(clip: TextClip) -> Self {
        Clip::Text(clip)
    }
}
