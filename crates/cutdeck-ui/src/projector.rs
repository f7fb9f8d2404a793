//! Layout projection: timeline model → lanes, clip boxes, ruler and grid.
//!
//! The projection is a full recomputation from the project on every call;
//! nothing is patched incrementally. All coordinates are canvas pixels
//! relative to the left edge of the timeline at time zero.

use cutdeck_core::{format_timecode, EditorConfig, TimeScale};
use cutdeck_timeline::{Clip, ClipId, Project, TrackKind};
use tracing::debug;

use crate::interaction::DragMode;

/// Grid lines closer than this are not drawn.
pub const MIN_GRID_SPACING_PX: f64 = 4.0;

/// Upper bound on ruler ticks per layout; longer timelines label every n-th second.
pub const MAX_RULER_TICKS: u64 = 10_000;

/// Grids that would need more lines than this are omitted.
pub const MAX_GRID_LINES: f64 = 20_000.0;

/// One clip rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipBox {
    pub clip_id: ClipId,
    pub left: f64,
    pub width: f64,
    pub label: String,
    pub selected: bool,
    /// Asset of a media clip; drives waveform lookup on audio lanes.
    pub asset_id: Option<String>,
    pub fade_in_px: f64,
    pub fade_out_px: f64,
}

impl ClipBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.left && x <= self.right()
    }
}

/// One track row.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneLayout {
    pub kind: TrackKind,
    pub track_index: usize,
    pub track_id: String,
    pub title: String,
    pub clips: Vec<ClipBox>,
}

/// A whole-second ruler mark.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub x: f64,
    pub seconds: u64,
    pub label: String,
}

/// Everything the painter needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub px_per_sec: f64,
    pub duration: f64,
    pub width: f64,
    pub lanes: Vec<LaneLayout>,
    pub ticks: Vec<RulerTick>,
    pub grid_lines: Vec<f64>,
}

/// Pixel metrics for projection and hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub min_clip_width_px: f64,
    pub handle_width_px: f64,
}

impl Projector {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            min_clip_width_px: config.min_clip_width_px,
            handle_width_px: config.handle_width_px,
        }
    }

    /// Project the whole timeline.
    pub fn layout(&self, project: &Project) -> TimelineLayout {
        let scale = project.time_scale();
        let duration = project.duration();
        let lanes: Vec<_> = project
            .all_tracks()
            .map(|(kind, track_index, track)| LaneLayout {
                kind,
                track_index,
                track_id: track.id.clone(),
                title: lane_title(kind, track_index),
                clips: track
                    .clips
                    .iter()
                    .map(|clip| self.clip_box(clip, scale, project.is_selected(clip.id())))
                    .collect(),
            })
            .collect();

        let grid_lines = grid_lines(duration, project.snap().step, scale);

        let layout = TimelineLayout {
            px_per_sec: scale.px_per_sec,
            duration,
            width: scale.to_px(duration),
            ticks: ruler_ticks(duration, scale),
            grid_lines,
            lanes,
        };
        debug!(
            lanes = layout.lanes.len(),
            duration,
            px_per_sec = scale.px_per_sec,
            "Layout recomputed"
        );
        layout
    }

    pub fn clip_box(&self, clip: &Clip, scale: TimeScale, selected: bool) -> ClipBox {
        let (asset_id, fade_in, fade_out) = match clip {
            Clip::Media(media) => (
                Some(media.asset_id.clone()),
                media.transition_in,
                media.transition_out,
            ),
            Clip::Text(_) => (None, 0.0, 0.0),
        };
        ClipBox {
            clip_id: clip.id().clone(),
            left: scale.to_px(clip.start()),
            width: scale.to_px(clip.duration()).max(self.min_clip_width_px),
            label: clip.label().to_string(),
            selected,
            asset_id,
            fade_in_px: fade_in * scale.px_per_sec,
            fade_out_px: fade_out * scale.px_per_sec,
        }
    }

    /// Which part of a clip box `x` falls on.
    pub fn hit_test(&self, clip: &ClipBox, x: f64) -> Option<DragMode> {
        if !clip.contains(x) {
            return None;
        }
        if x <= clip.left + self.handle_width_px {
            Some(DragMode::TrimLeft)
        } else if x >= clip.right() - self.handle_width_px {
            Some(DragMode::TrimRight)
        } else {
            Some(DragMode::Move)
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl TimelineLayout {
    /// Topmost clip under `x` in a lane, with the drag mode it would start.
    ///
    /// Later clips paint over earlier ones, so they win.
    pub fn hit(&self, projector: &Projector, lane: usize, x: f64) -> Option<(&ClipBox, DragMode)> {
        self.lanes
            .get(lane)?
            .clips
            .iter()
            .rev()
            .find_map(|clip| projector.hit_test(clip, x).map(|mode| (clip, mode)))
    }

    pub fn lane_of(&self, kind: TrackKind, track_index: usize) -> Option<usize> {
        self.lanes
            .iter()
            .position(|lane| lane.kind == kind && lane.track_index == track_index)
    }
}

fn lane_title(kind: TrackKind, track_index: usize) -> String {
    let name = match kind {
        TrackKind::Video => "Video",
        TrackKind::Audio => "Audio",
        TrackKind::Text => "Text",
    };
    format!("{} {}", name, track_index + 1)
}

fn ruler_ticks(duration: f64, scale: TimeScale) -> Vec<RulerTick> {
    let last = duration.max(0.0).floor() as u64;
    let stride = last / MAX_RULER_TICKS + 1;
    (0..=last)
        .step_by(stride as usize)
        .map(|seconds| RulerTick {
            x: scale.to_px(seconds as f64),
            seconds,
            label: format_timecode(seconds as f64),
        })
        .collect()
}

fn grid_lines(duration: f64, step: f64, scale: TimeScale) -> Vec<f64> {
    if !(step > 0.0) || step * scale.px_per_sec < MIN_GRID_SPACING_PX {
        return Vec::new();
    }
    let count = (duration / step).floor();
    if !(count <= MAX_GRID_LINES) {
        return Vec::new();
    }
    (0..=count as usize)
        .map(|i| (i as f64 * step * scale.px_per_sec).round())
        .collect()
}
