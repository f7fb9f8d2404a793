//! Edit operations on a project.
//!
//! Each operation either mutates the project and leaves every touched clip
//! normalized, or returns an [`EditError`] without changing anything.

use cutdeck_core::{coerce_number, finite_or, round_to};
use tracing::{debug, info};

use crate::asset::AssetLibrary;
use crate::clip::{Clip, ClipId, MediaClip, TextClip};
use crate::error::{EditError, EditResult};
use crate::normalize::{normalize, normalize_media, normalize_text};
use crate::project::Project;
use crate::track::TrackKind;

/// Distance a split point must keep from either clip edge, in seconds.
pub const SPLIT_MARGIN: f64 = 0.05;
/// Bounds of the default length of a newly added media clip.
pub const DEFAULT_MEDIA_DURATION_MIN: f64 = 0.5;
pub const DEFAULT_MEDIA_DURATION_MAX: f64 = 8.0;

// ── Field updates ───────────────────────────────────────────────

/// A single field change on a media clip.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaUpdate {
    Start(f64),
    InPoint(f64),
    Duration(f64),
    TransitionIn(f64),
    TransitionOut(f64),
    Volume(f64),
}

/// A single field change on a caption clip.
#[derive(Debug, Clone, PartialEq)]
pub enum TextUpdate {
    Text(String),
    Start(f64),
    End(f64),
    FontSize(f64),
    Color(String),
    X(f64),
    Y(f64),
}

/// A field change, tagged by the clip variant it applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipUpdate {
    Media(MediaUpdate),
    Text(TextUpdate),
}

impl MediaUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::InPoint(_) => "in_point",
            Self::Duration(_) => "duration",
            Self::TransitionIn(_) => "transition_in",
            Self::TransitionOut(_) => "transition_out",
            Self::Volume(_) => "volume",
        }
    }

    fn apply(self, clip: &mut MediaClip) {
        match self {
            Self::Start(v) => clip.start = finite_or(v, 0.0),
            Self::InPoint(v) => clip.in_point = finite_or(v, 0.0),
            Self::Duration(v) => clip.duration = finite_or(v, 0.0),
            Self::TransitionIn(v) => clip.transition_in = finite_or(v, 0.0),
            Self::TransitionOut(v) => clip.transition_out = finite_or(v, 0.0),
            Self::Volume(v) => clip.volume = finite_or(v, 0.0),
        }
    }
}

impl TextUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Start(_) => "start",
            Self::End(_) => "end",
            Self::FontSize(_) => "font_size",
            Self::Color(_) => "color",
            Self::X(_) => "x",
            Self::Y(_) => "y",
        }
    }

    fn apply(self, clip: &mut TextClip) {
        match self {
            Self::Text(v) => clip.text = v,
            Self::Start(v) => clip.start = finite_or(v, 0.0),
            Self::End(v) => clip.end = finite_or(v, 0.0),
            Self::FontSize(v) => {
                clip.font_size = finite_or(v, 0.0).round().clamp(0.0, u32::MAX as f64) as u32
            }
            Self::Color(v) => clip.color = v,
            Self::X(v) => clip.x = finite_or(v, 0.0),
            Self::Y(v) => clip.y = finite_or(v, 0.0),
        }
    }
}

impl ClipUpdate {
    /// Build an update from a field name and raw user input.
    ///
    /// Numeric fields go through [`coerce_number`]; string fields are kept
    /// verbatim. Returns `None` for a field the lane kind does not have.
    pub fn parse(lane: TrackKind, field: &str, raw: &str) -> Option<Self> {
        let num = || coerce_number(raw);
        if lane.is_media() {
            let update = match field {
                "start" => MediaUpdate::Start(num()),
                "in_point" => MediaUpdate::InPoint(num()),
                "duration" => MediaUpdate::Duration(num()),
                "transition_in" => MediaUpdate::TransitionIn(num()),
                "transition_out" => MediaUpdate::TransitionOut(num()),
                "volume" => MediaUpdate::Volume(num()),
                _ => return None,
            };
            Some(Self::Media(update))
        } else {
            let update = match field {
                "text" => TextUpdate::Text(raw.to_string()),
                "start" => TextUpdate::Start(num()),
                "end" => TextUpdate::End(num()),
                "font_size" => TextUpdate::FontSize(num()),
                "color" => TextUpdate::Color(raw.to_string()),
                "x" => TextUpdate::X(num()),
                "y" => TextUpdate::Y(num()),
                _ => return None,
            };
            Some(Self::Text(update))
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::Media(u) => u.field(),
            Self::Text(u) => u.field(),
        }
    }
}

// ── Caption request ─────────────────────────────────────────────

/// Input for [`Project::add_caption`].
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionRequest {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub font_size: u32,
    pub color: String,
    pub x: f64,
    pub y: f64,
}

impl CaptionRequest {
    /// Caption with default styling and position.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            font_size: TextClip::DEFAULT_FONT_SIZE,
            color: TextClip::DEFAULT_COLOR.to_string(),
            x: TextClip::DEFAULT_X,
            y: TextClip::DEFAULT_Y,
        }
    }
}

// ── Operations ──────────────────────────────────────────────────

impl Project {
    /// Append a clip of `asset_id` to the end of a video or audio track.
    ///
    /// The clip starts at the track's current end time and its length is
    /// the asset duration clamped to 0.5–8 s. The new clip is selected.
    pub fn add_media_clip(
        &mut self,
        lane: TrackKind,
        track_index: usize,
        asset_id: &str,
        assets: &AssetLibrary,
    ) -> EditResult<ClipId> {
        if !lane.is_media() {
            return Err(EditError::LaneMismatch { lane });
        }
        let track = self
            .track(lane, track_index)
            .ok_or(EditError::TrackNotFound {
                lane,
                index: track_index,
            })?;
        let asset = assets
            .get(asset_id)
            .ok_or_else(|| EditError::AssetNotFound(asset_id.to_string()))?;
        if !asset.supports(lane) {
            return Err(EditError::MissingStream {
                asset: asset.name.clone(),
                lane,
            });
        }

        let start = round_to(track.end_time(), 2);
        let duration = finite_or(asset.duration, 0.0)
            .clamp(DEFAULT_MEDIA_DURATION_MIN, DEFAULT_MEDIA_DURATION_MAX);
        let id = self.ids.clip_id();
        let mut clip = MediaClip {
            id: id.clone(),
            asset_id: asset.id.clone(),
            start,
            in_point: 0.0,
            duration,
            transition_in: 0.0,
            transition_out: 0.0,
            volume: 1.0,
        };
        normalize_media(&mut clip, asset.known_duration());

        if let Some(track) = self.track_mut(lane, track_index) {
            track.push(Clip::Media(clip));
        }
        self.select(&id);
        info!(
            clip = %id,
            asset = asset_id,
            %lane,
            track = track_index,
            start,
            duration,
            "Added media clip"
        );
        Ok(id)
    }

    /// Add a caption to the text track.
    pub fn add_caption(&mut self, request: CaptionRequest) -> EditResult<ClipId> {
        if request.text.trim().is_empty() {
            return Err(EditError::EmptyCaption);
        }
        let span_ok =
            request.start.is_finite() && request.end.is_finite() && request.end > request.start;
        if !span_ok {
            return Err(EditError::InvalidCaptionSpan {
                start: request.start,
                end: request.end,
            });
        }
        if self.text_tracks.is_empty() {
            return Err(EditError::TrackNotFound {
                lane: TrackKind::Text,
                index: 0,
            });
        }

        let id = self.ids.clip_id();
        let mut clip = TextClip {
            id: id.clone(),
            text: request.text,
            start: request.start,
            end: request.end,
            font_size: request.font_size,
            color: request.color,
            x: request.x,
            y: request.y,
        };
        normalize_text(&mut clip);
        let (start, end) = (clip.start, clip.end);
        self.text_tracks[0].push(Clip::Text(clip));
        self.select(&id);
        info!(clip = %id, start, end, "Added caption");
        Ok(id)
    }

    /// Change one field of a clip, then normalize it.
    pub fn update_clip(
        &mut self,
        id: &ClipId,
        update: ClipUpdate,
        assets: &AssetLibrary,
    ) -> EditResult<()> {
        let loc = self
            .locate(id)
            .ok_or_else(|| EditError::ClipNotFound(id.clone()))?;
        let field = update.field();
        let clip = &mut self.tracks_mut(loc.lane)[loc.track_index].clips[loc.clip_index];
        match (clip, update) {
            (Clip::Media(media), ClipUpdate::Media(u)) => u.apply(media),
            (Clip::Text(text), ClipUpdate::Text(u)) => u.apply(text),
            _ => {
                return Err(EditError::FieldMismatch {
                    field,
                    lane: loc.lane,
                })
            }
        }
        let clip = &mut self.tracks_mut(loc.lane)[loc.track_index].clips[loc.clip_index];
        normalize(clip, assets);
        debug!(clip = %id, field, "Updated clip field");
        Ok(())
    }

    /// Delete a clip. Clears the selection if it pointed at this clip.
    pub fn remove_clip(&mut self, id: &ClipId) -> EditResult<Clip> {
        let loc = self
            .locate(id)
            .ok_or_else(|| EditError::ClipNotFound(id.clone()))?;
        let removed = self.tracks_mut(loc.lane)[loc.track_index]
            .clips
            .remove(loc.clip_index);
        self.clear_selection_if(id);
        info!(clip = %id, lane = %loc.lane, "Removed clip");
        Ok(removed)
    }

    /// Split a media clip `offset` seconds after its start.
    ///
    /// The original keeps its fade-in and is truncated to `offset`; the new
    /// tail piece carries the fade-out. Returns the tail's id.
    pub fn split_clip(
        &mut self,
        id: &ClipId,
        offset: f64,
        assets: &AssetLibrary,
    ) -> EditResult<ClipId> {
        let loc = self
            .locate(id)
            .ok_or_else(|| EditError::ClipNotFound(id.clone()))?;
        let original = match &self.tracks(loc.lane)[loc.track_index].clips[loc.clip_index] {
            Clip::Media(media) => media.clone(),
            Clip::Text(_) => return Err(EditError::SplitTextClip),
        };

        let min = SPLIT_MARGIN;
        let max = original.duration - SPLIT_MARGIN;
        if !(offset.is_finite() && offset > min && offset < max) {
            return Err(EditError::InvalidSplitOffset { offset, min, max });
        }

        let tail_id = self.ids.clip_id();
        let asset_duration = assets.duration_of(&original.asset_id);

        let mut head = original.clone();
        head.duration = offset;
        head.transition_out = 0.0;
        normalize_media(&mut head, asset_duration);

        let mut tail = MediaClip {
            id: tail_id.clone(),
            start: original.start + offset,
            in_point: original.in_point + offset,
            duration: original.duration - offset,
            transition_in: 0.0,
            transition_out: original.transition_out,
            ..original
        };
        normalize_media(&mut tail, asset_duration);

        let track = &mut self.tracks_mut(loc.lane)[loc.track_index];
        track.clips[loc.clip_index] = Clip::Media(head);
        track.push(Clip::Media(tail));
        track.sort_by_start();
        self.refresh_selection();
        info!(clip = %id, tail = %tail_id, offset, "Split clip");
        Ok(tail_id)
    }

    /// Split a media clip at an absolute timeline time.
    pub fn split_clip_at(
        &mut self,
        id: &ClipId,
        time: f64,
        assets: &AssetLibrary,
    ) -> EditResult<ClipId> {
        let start = self
            .clip(id)
            .map(Clip::start)
            .ok_or_else(|| EditError::ClipNotFound(id.clone()))?;
        self.split_clip(id, time - start, assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, AssetKind};

    fn asset(id: &str, kind: AssetKind, duration: f64, has_video: bool, has_audio: bool) -> Asset {
        Asset {
            id: id.into(),
            name: format!("{id}.bin"),
            kind,
            duration,
            has_video,
            has_audio,
            size_bytes: 0,
        }
    }

    fn library() -> AssetLibrary {
        [
            asset("vid10", AssetKind::Video, 10.0, true, true),
            asset("vid3", AssetKind::Video, 3.0, true, false),
            asset("song", AssetKind::Audio, 120.0, false, true),
            asset("still", AssetKind::Image, 0.0, true, false),
        ]
        .into_iter()
        .collect()
    }

    fn media<'a>(project: &'a Project, id: &ClipId) -> &'a MediaClip {
        project.clip(id).and_then(Clip::as_media).unwrap()
    }

    #[test]
    fn test_add_media_clip_defaults() {
        let mut project = Project::default();
        let assets = library();
        let id = project
            .add_media_clip(TrackKind::Video, 0, "vid10", &assets)
            .unwrap();
        let clip = media(&project, &id);
        assert_eq!(clip.start, 0.0);
        assert_eq!(clip.in_point, 0.0);
        assert_eq!(clip.duration, 8.0);
        assert_eq!(clip.volume, 1.0);
        assert!(project.is_selected(&id));
    }

    #[test]
    fn test_add_media_clip_appends_at_track_end() {
        let mut project = Project::default();
        let assets = library();
        project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        let second = project.add_media_clip(TrackKind::Video, 0, "vid10", &assets).unwrap();
        assert_eq!(media(&project, &second).start, 3.0);
    }

    #[test]
    fn test_still_image_gets_minimum_default() {
        let mut project = Project::default();
        let id = project
            .add_media_clip(TrackKind::Video, 0, "still", &library())
            .unwrap();
        assert_eq!(media(&project, &id).duration, DEFAULT_MEDIA_DURATION_MIN);
    }

    #[test]
    fn test_add_media_clip_referential_errors() {
        let mut project = Project::default();
        let assets = library();
        assert!(matches!(
            project.add_media_clip(TrackKind::Video, 3, "vid10", &assets),
            Err(EditError::TrackNotFound { index: 3, .. })
        ));
        assert!(matches!(
            project.add_media_clip(TrackKind::Video, 0, "nope", &assets),
            Err(EditError::AssetNotFound(_))
        ));
        assert!(matches!(
            project.add_media_clip(TrackKind::Video, 0, "song", &assets),
            Err(EditError::MissingStream { .. })
        ));
        assert!(matches!(
            project.add_media_clip(TrackKind::Audio, 0, "vid3", &assets),
            Err(EditError::MissingStream { .. })
        ));
        assert!(matches!(
            project.add_media_clip(TrackKind::Text, 0, "vid10", &assets),
            Err(EditError::LaneMismatch { .. })
        ));
        assert_eq!(project.clip_count(), 0);
    }

    #[test]
    fn test_add_caption_validation() {
        let mut project = Project::default();
        assert_eq!(
            project.add_caption(CaptionRequest::new("   ", 0.0, 2.0)),
            Err(EditError::EmptyCaption)
        );
        assert!(matches!(
            project.add_caption(CaptionRequest::new("Hi", 2.0, 2.0)),
            Err(EditError::InvalidCaptionSpan { .. })
        ));
        assert_eq!(project.clip_count(), 0);

        let id = project.add_caption(CaptionRequest::new("Hi", 1.0, 3.0)).unwrap();
        let clip = project.clip(&id).and_then(Clip::as_text).unwrap();
        assert_eq!(clip.duration(), 2.0);
        assert_eq!(clip.font_size, 42);
        assert_eq!(project.text_tracks[0].clip_count(), 1);
    }

    #[test]
    fn test_update_field_normalizes() {
        let mut project = Project::default();
        let assets = library();
        let id = project.add_media_clip(TrackKind::Video, 0, "vid10", &assets).unwrap();

        project
            .update_clip(&id, ClipUpdate::Media(MediaUpdate::InPoint(9.0)), &assets)
            .unwrap();
        assert!((media(&project, &id).duration - 1.0).abs() < 1e-9);

        let update = ClipUpdate::parse(TrackKind::Video, "start", "abc").unwrap();
        project.update_clip(&id, update, &assets).unwrap();
        assert_eq!(media(&project, &id).start, 0.0);

        let update = ClipUpdate::parse(TrackKind::Video, "transition_in", "5").unwrap();
        project.update_clip(&id, update, &assets).unwrap();
        assert!((media(&project, &id).transition_in - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_update_text_fields() {
        let mut project = Project::default();
        let assets = library();
        let id = project.add_caption(CaptionRequest::new("Hi", 1.0, 3.0)).unwrap();

        let update = ClipUpdate::parse(TrackKind::Text, "color", "#ff0000").unwrap();
        project.update_clip(&id, update, &assets).unwrap();
        let update = ClipUpdate::parse(TrackKind::Text, "font_size", "3").unwrap();
        project.update_clip(&id, update, &assets).unwrap();
        let update = ClipUpdate::parse(TrackKind::Text, "end", "0.5").unwrap();
        project.update_clip(&id, update, &assets).unwrap();

        let clip = project.clip(&id).and_then(Clip::as_text).unwrap();
        assert_eq!(clip.color, "#ff0000");
        assert_eq!(clip.font_size, 10);
        assert!((clip.end - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_update_mismatch_and_missing() {
        let mut project = Project::default();
        let assets = library();
        let id = project.add_caption(CaptionRequest::new("Hi", 1.0, 3.0)).unwrap();
        assert!(matches!(
            project.update_clip(&id, ClipUpdate::Media(MediaUpdate::Volume(0.5)), &assets),
            Err(EditError::FieldMismatch { field: "volume", .. })
        ));
        assert!(matches!(
            project.update_clip(
                &ClipId::new("clip-99"),
                ClipUpdate::Text(TextUpdate::X(1.0)),
                &assets
            ),
            Err(EditError::ClipNotFound(_))
        ));
        assert_eq!(ClipUpdate::parse(TrackKind::Text, "volume", "1"), None);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut project = Project::default();
        let assets = library();
        let id = project.add_media_clip(TrackKind::Audio, 0, "song", &assets).unwrap();
        assert!(project.is_selected(&id));
        project.remove_clip(&id).unwrap();
        assert!(project.selection().is_none());
        assert_eq!(project.clip_count(), 0);
        assert!(project.remove_clip(&id).is_err());
    }

    #[test]
    fn test_remove_keeps_other_selection() {
        let mut project = Project::default();
        let assets = library();
        let first = project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        let second = project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        project.remove_clip(&first).unwrap();
        assert!(project.is_selected(&second));
    }

    #[test]
    fn test_split_moves_fade_out_to_tail() {
        let mut project = Project::default();
        let assets = library();
        let id = project.add_media_clip(TrackKind::Video, 0, "vid10", &assets).unwrap();
        project
            .update_clip(&id, ClipUpdate::Media(MediaUpdate::TransitionIn(0.5)), &assets)
            .unwrap();
        project
            .update_clip(&id, ClipUpdate::Media(MediaUpdate::TransitionOut(0.75)), &assets)
            .unwrap();

        let tail_id = project.split_clip(&id, 3.0, &assets).unwrap();
        let head = media(&project, &id).clone();
        let tail = media(&project, &tail_id).clone();

        assert_eq!(head.duration, 3.0);
        assert_eq!(head.transition_in, 0.5);
        assert_eq!(head.transition_out, 0.0);
        assert_eq!(tail.start, 3.0);
        assert_eq!(tail.in_point, 3.0);
        assert_eq!(tail.duration, 5.0);
        assert_eq!(tail.transition_in, 0.0);
        assert_eq!(tail.transition_out, 0.75);
        assert_eq!(project.video_tracks[0].clips[1].id(), &tail_id);
    }

    #[test]
    fn test_split_resorts_track() {
        let mut project = Project::default();
        let assets = library();
        let a = project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        let b = project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        let tail = project.split_clip(&a, 1.0, &assets).unwrap();
        let order: Vec<_> = project.video_tracks[0].clips.iter().map(|c| c.id().clone()).collect();
        assert_eq!(order, vec![a, tail, b]);
    }

    #[test]
    fn test_split_rejects_edge_offsets() {
        let mut project = Project::default();
        let assets = library();
        let id = project.add_media_clip(TrackKind::Video, 0, "vid10", &assets).unwrap();
        project
            .update_clip(&id, ClipUpdate::Media(MediaUpdate::Duration(4.0)), &assets)
            .unwrap();
        let before = project.clone();

        for offset in [0.0, 0.05, 3.95, 3.98, -1.0, f64::NAN] {
            assert!(matches!(
                project.split_clip(&id, offset, &assets),
                Err(EditError::InvalidSplitOffset { .. })
            ));
        }
        assert_eq!(project.video_tracks, before.video_tracks);
    }

    #[test]
    fn test_split_text_rejected() {
        let mut project = Project::default();
        let id = project.add_caption(CaptionRequest::new("Hi", 0.0, 4.0)).unwrap();
        assert_eq!(
            project.split_clip(&id, 1.0, &library()),
            Err(EditError::SplitTextClip)
        );
    }

    #[test]
    fn test_split_at_absolute_time() {
        let mut project = Project::default();
        let assets = library();
        project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        let id = project.add_media_clip(TrackKind::Video, 0, "vid3", &assets).unwrap();
        let tail = project.split_clip_at(&id, 4.0, &assets).unwrap();
        assert_eq!(media(&project, &tail).start, 4.0);
        assert_eq!(media(&project, &id).duration, 1.0);
    }
}
