//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clip::{Clip, ClipId};

/// Kind of track (lane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

impl TrackKind {
    /// All kinds, in lane display order.
    pub const ALL: [TrackKind; 3] = [TrackKind::Video, TrackKind::Audio, TrackKind::Text];

    /// Video and audio lanes hold media clips.
    pub fn is_media(self) -> bool {
        matches!(self, TrackKind::Video | TrackKind::Audio)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
            TrackKind::Text => "text",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            TrackKind::Video => 0,
            TrackKind::Audio => 1,
            TrackKind::Text => 2,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lane holding clips of one kind.
///
/// Clip order is insertion order, not time order; clips may overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique within its kind (`video-1`, `text-1`, ...).
    pub id: String,
    pub kind: TrackKind,
    pub clips: Vec<Clip>,
}

impl Track {
    /// Create an empty track.
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            clips: Vec::new(),
        }
    }

    /// Latest clip end time, 0 for an empty track.
    pub fn end_time(&self) -> f64 {
        self.clips.iter().map(Clip::end).fold(0.0, f64::max)
    }

    /// Find a clip by id. Returns (index, &Clip).
    pub fn find_clip(&self, id: &ClipId) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id() == id)
    }

    /// Find a clip mutably by id. Returns (index, &mut Clip).
    pub fn find_clip_mut(&mut self, id: &ClipId) -> Option<(usize, &mut Clip)> {
        self.clips
            .iter_mut()
            .enumerate()
            .find(|(_, clip)| clip.id() == id)
    }

    /// Append a clip to the end of the list.
    pub fn push(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Remove a clip by id. Returns the removed clip.
    pub fn remove_clip(&mut self, id: &ClipId) -> Option<Clip> {
        let (index, _) = self.find_clip(id)?;
        Some(self.clips.remove(index))
    }

    /// Re-order clips by start time (stable for equal starts).
    pub fn sort_by_start(&mut self) {
        self.clips.sort_by(|a, b| a.start().total_cmp(&b.start()));
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
