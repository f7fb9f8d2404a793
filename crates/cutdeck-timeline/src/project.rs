//! Project (editing session) state.

use cutdeck_core::{EditorConfig, SnapGrid, TimeScale, ZoomRange};

use crate::clip::{Clip, ClipId};
use crate::track::{Track, TrackKind};

/// Canvas length of an empty project, in seconds.
pub const MIN_PROJECT_DURATION: f64 = 6.0;
/// Empty space kept after the last clip, in seconds.
pub const TRAILING_PADDING: f64 = 0.5;

/// The single selected clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub lane: TrackKind,
    pub track_index: usize,
    pub clip_id: ClipId,
}

/// Where a clip lives in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipLocation {
    pub lane: TrackKind,
    pub track_index: usize,
    pub clip_index: usize,
}

/// Monotonic id counters, one for clips and one per track kind.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_clip: u64,
    next_track: [u64; 3],
}

impl IdAllocator {
    pub fn clip_id(&mut self) -> ClipId {
        self.next_clip += 1;
        ClipId::new(format!("clip-{}", self.next_clip))
    }

    pub fn track_id(&mut self, kind: TrackKind) -> String {
        let counter = &mut self.next_track[kind.index()];
        *counter += 1;
        format!("{}-{}", kind, counter)
    }
}

/// In-memory project: tracks, zoom, snapping and selection.
///
/// Mutated only through the operations in [`crate::edit`] and the
/// setters below; clips stay normalized after every call.
#[derive(Debug, Clone)]
pub struct Project {
    pub video_tracks: Vec<Track>,
    pub audio_tracks: Vec<Track>,
    pub text_tracks: Vec<Track>,
    zoom: f64,
    zoom_range: ZoomRange,
    zoom_step: f64,
    snap: SnapGrid,
    selection: Option<Selection>,
    pub(crate) ids: IdAllocator,
}

impl Project {
    /// Create a project with one empty track of each kind.
    pub fn new(config: &EditorConfig) -> Self {
        let mut ids = IdAllocator::default();
        let video_tracks = vec![Track::new(ids.track_id(TrackKind::Video), TrackKind::Video)];
        let audio_tracks = vec![Track::new(ids.track_id(TrackKind::Audio), TrackKind::Audio)];
        let text_tracks = vec![Track::new(ids.track_id(TrackKind::Text), TrackKind::Text)];
        Self {
            video_tracks,
            audio_tracks,
            text_tracks,
            zoom: config.zoom_range.clamp(config.zoom),
            zoom_range: config.zoom_range,
            zoom_step: config.zoom_step,
            snap: config.snap_grid(),
            selection: None,
            ids,
        }
    }

    // ── Tracks ──────────────────────────────────────────────────

    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        match kind {
            TrackKind::Video => &self.video_tracks,
            TrackKind::Audio => &self.audio_tracks,
            TrackKind::Text => &self.text_tracks,
        }
    }

    pub fn tracks_mut(&mut self, kind: TrackKind) -> &mut Vec<Track> {
        match kind {
            TrackKind::Video => &mut self.video_tracks,
            TrackKind::Audio => &mut self.audio_tracks,
            TrackKind::Text => &mut self.text_tracks,
        }
    }

    pub fn track(&self, kind: TrackKind, index: usize) -> Option<&Track> {
        self.tracks(kind).get(index)
    }

    pub fn track_mut(&mut self, kind: TrackKind, index: usize) -> Option<&mut Track> {
        self.tracks_mut(kind).get_mut(index)
    }

    /// Append a new empty track. Returns its index within the kind.
    pub fn add_track(&mut self, kind: TrackKind) -> usize {
        let id = self.ids.track_id(kind);
        let tracks = self.tracks_mut(kind);
        tracks.push(Track::new(id, kind));
        tracks.len() - 1
    }

    /// Every track with its kind and index, in lane display order.
    pub fn all_tracks(&self) -> impl Iterator<Item = (TrackKind, usize, &Track)> {
        TrackKind::ALL.into_iter().flat_map(move |kind| {
            self.tracks(kind)
                .iter()
                .enumerate()
                .map(move |(index, track)| (kind, index, track))
        })
    }

    // ── Clips ───────────────────────────────────────────────────

    pub fn locate(&self, id: &ClipId) -> Option<ClipLocation> {
        self.all_tracks().find_map(|(lane, track_index, track)| {
            track.find_clip(id).map(|(clip_index, _)| ClipLocation {
                lane,
                track_index,
                clip_index,
            })
        })
    }

    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        let loc = self.locate(id)?;
        self.tracks(loc.lane)[loc.track_index].clips.get(loc.clip_index)
    }

    pub fn clip_mut(&mut self, id: &ClipId) -> Option<&mut Clip> {
        let loc = self.locate(id)?;
        self.tracks_mut(loc.lane)[loc.track_index]
            .clips
            .get_mut(loc.clip_index)
    }

    pub fn clip_count(&self) -> usize {
        self.all_tracks().map(|(_, _, t)| t.clip_count()).sum()
    }

    /// Latest clip end across all tracks, 0 when empty.
    pub fn content_end(&self) -> f64 {
        self.all_tracks()
            .map(|(_, _, t)| t.end_time())
            .fold(0.0, f64::max)
    }

    /// Canvas duration: at least 6 s, and 0.5 s past the last clip.
    pub fn duration(&self) -> f64 {
        self.all_tracks()
            .flat_map(|(_, _, t)| t.clips.iter())
            .map(|c| c.end() + TRAILING_PADDING)
            .fold(MIN_PROJECT_DURATION, f64::max)
    }

    /// True when at least one video or text clip exists.
    pub fn has_visual_content(&self) -> bool {
        self.video_tracks
            .iter()
            .chain(self.text_tracks.iter())
            .any(|t| !t.is_empty())
    }

    // ── Selection ───────────────────────────────────────────────

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Select a clip by id. Returns false if the clip does not exist.
    pub fn select(&mut self, id: &ClipId) -> bool {
        match self.locate(id) {
            Some(loc) => {
                self.selection = Some(Selection {
                    lane: loc.lane,
                    track_index: loc.track_index,
                    clip_id: id.clone(),
                });
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selection.as_ref().and_then(|s| self.clip(&s.clip_id))
    }

    pub fn is_selected(&self, id: &ClipId) -> bool {
        self.selection.as_ref().is_some_and(|s| &s.clip_id == id)
    }

    // ── Zoom & snapping ─────────────────────────────────────────

    /// Pixels per second.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom, clamped to the configured range. Returns the new value.
    pub fn set_zoom(&mut self, px_per_sec: f64) -> f64 {
        self.zoom = self.zoom_range.clamp(px_per_sec);
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom * self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom / self.zoom_step)
    }

    pub fn time_scale(&self) -> TimeScale {
        TimeScale::new(self.zoom)
    }

    pub fn snap(&self) -> SnapGrid {
        self.snap
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap.enabled = enabled;
    }

    /// Change the snap step; invalid steps are ignored.
    pub fn set_snap_step(&mut self, step: f64) -> bool {
        self.snap.set_step(step)
    }

    /// Quantize a time value with the project's snap settings.
    pub fn quantize(&self, value: f64, bypass: bool) -> f64 {
        self.snap.quantize(value, bypass)
    }

    pub(crate) fn clear_selection_if(&mut self, id: &ClipId) {
        if self.is_selected(id) {
            self.selection = None;
        }
    }

    pub(crate) fn refresh_selection(&mut self) {
        if let Some(id) = self.selection.as_ref().map(|s| s.clip_id.clone()) {
            if !self.select(&id) {
                self.selection = None;
            }
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
