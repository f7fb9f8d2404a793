//! Export payload serialization.
//!
//! Snapshots a project into the request body accepted by the render
//! backend. Every clip is re-sanitized on the way out, independent of the
//! in-memory state.

use cutdeck_core::{CutdeckError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clip::{Clip, MediaClip, TextClip};
use crate::error::{EditError, EditResult};
use crate::normalize::{normalize_media, normalize_text};
use crate::project::Project;
use crate::track::Track;

pub const MIN_EXPORT_WIDTH: u32 = 320;
pub const MIN_EXPORT_HEIGHT: u32 = 240;
pub const MIN_EXPORT_FPS: u32 = 12;
pub const MAX_EXPORT_FPS: u32 = 60;

/// Output format requested from the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bg_color: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 24,
            bg_color: "black".to_string(),
        }
    }
}

impl ExportSettings {
    /// Clamp to the renderer's accepted ranges.
    pub fn sanitized(&self) -> Self {
        let bg_color = match self.bg_color.trim() {
            "" => "black".to_string(),
            color => color.to_string(),
        };
        Self {
            width: self.width.max(MIN_EXPORT_WIDTH),
            height: self.height.max(MIN_EXPORT_HEIGHT),
            fps: self.fps.clamp(MIN_EXPORT_FPS, MAX_EXPORT_FPS),
            bg_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaClipPayload {
    pub id: String,
    pub asset_id: String,
    pub start: f64,
    pub in_point: f64,
    pub duration: f64,
    pub transition_in: f64,
    pub transition_out: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClipPayload {
    pub id: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub font_size: u32,
    pub color: String,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaTrackPayload {
    pub id: String,
    pub clips: Vec<MediaClipPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTrackPayload {
    pub id: String,
    pub clips: Vec<TextClipPayload>,
}

/// Body of an export submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bg_color: String,
    pub video_tracks: Vec<MediaTrackPayload>,
    pub audio_tracks: Vec<MediaTrackPayload>,
    pub text_tracks: Vec<TextTrackPayload>,
}

impl ExportPayload {
    /// Serialize to a JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| CutdeckError::Serialization(format!("Failed to serialize export: {}", e)))
    }

    pub fn clip_count(&self) -> usize {
        let media: usize = self
            .video_tracks
            .iter()
            .chain(self.audio_tracks.iter())
            .map(|t| t.clips.len())
            .sum();
        let text: usize = self.text_tracks.iter().map(|t| t.clips.len()).sum();
        media + text
    }
}

fn media_payload(clip: &MediaClip) -> MediaClipPayload {
    let mut clip = clip.clone();
    normalize_media(&mut clip, None);
    MediaClipPayload {
        id: clip.id.to_string(),
        asset_id: clip.asset_id,
        start: clip.start,
        in_point: clip.in_point,
        duration: clip.duration,
        transition_in: clip.transition_in,
        transition_out: clip.transition_out,
        volume: clip.volume,
    }
}

fn text_payload(clip: &TextClip) -> TextClipPayload {
    let mut clip = clip.clone();
    normalize_text(&mut clip);
    TextClipPayload {
        id: clip.id.to_string(),
        text: clip.text,
        start: clip.start,
        end: clip.end,
        font_size: clip.font_size,
        color: clip.color,
        x: clip.x.round() as i64,
        y: clip.y.round() as i64,
    }
}

fn media_track(track: &Track) -> MediaTrackPayload {
    MediaTrackPayload {
        id: track.id.clone(),
        clips: track
            .clips
            .iter()
            .filter_map(Clip::as_media)
            .map(media_payload)
            .collect(),
    }
}

fn text_track(track: &Track) -> TextTrackPayload {
    TextTrackPayload {
        id: track.id.clone(),
        clips: track
            .clips
            .iter()
            .filter_map(Clip::as_text)
            .map(text_payload)
            .collect(),
    }
}

/// Build the export request for `project`.
///
/// Refused with [`EditError::NothingToExport`] when no video or text clip
/// exists; audio alone is not a renderable timeline.
pub fn build_export_payload(
    project: &Project,
    settings: &ExportSettings,
) -> EditResult<ExportPayload> {
    if !project.has_visual_content() {
        return Err(EditError::NothingToExport);
    }
    let settings = settings.sanitized();
    let payload = ExportPayload {
        width: settings.width,
        height: settings.height,
        fps: settings.fps,
        bg_color: settings.bg_color,
        video_tracks: project.video_tracks.iter().map(media_track).collect(),
        audio_tracks: project.audio_tracks.iter().map(media_track).collect(),
        text_tracks: project.text_tracks.iter().map(text_track).collect(),
    };
    debug!(
        clips = payload.clip_count(),
        width = payload.width,
        height = payload.height,
        "Built export payload"
    );
    Ok(payload)
}

impl Project {
    pub fn export_payload(&self, settings: &ExportSettings) -> EditResult<ExportPayload> {
        build_export_payload(self, settings)
    }
}
