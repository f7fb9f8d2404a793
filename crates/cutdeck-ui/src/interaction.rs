//! Pointer interaction on timeline clips: move, trim-left and trim-right.
//!
//! A gesture starts on pointer-down, is applied on every pointer-move
//! relative to a snapshot taken at pointer-down, and always commits on
//! pointer-up. Each frame recomputes from the snapshot, so repeated moves
//! never accumulate drift.

use cutdeck_core::SnapGrid;
use cutdeck_timeline::{
    normalize, AssetLibrary, Clip, ClipId, Project, MIN_MEDIA_DURATION, MIN_TEXT_SPAN,
};
use egui::CursorIcon;
use tracing::debug;

/// What a drag does to its clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Shift the whole clip in time.
    Move,
    /// Move the left edge, keeping the right edge fixed.
    TrimLeft,
    /// Move the right edge.
    TrimRight,
}

impl DragMode {
    pub fn cursor(self) -> CursorIcon {
        match self {
            DragMode::Move => CursorIcon::Grab,
            DragMode::TrimLeft => CursorIcon::ResizeWest,
            DragMode::TrimRight => CursorIcon::ResizeEast,
        }
    }
}

/// Clip values captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    pub start: f64,
    pub duration: f64,
    pub in_point: f64,
    /// Caption end; equals `start + duration` for media clips.
    pub end: f64,
    pub pointer_x: f64,
}

impl DragOrigin {
    pub fn capture(clip: &Clip, pointer_x: f64) -> Self {
        Self {
            start: clip.start(),
            duration: clip.duration(),
            in_point: clip.as_media().map_or(0.0, |m| m.in_point),
            end: clip.end(),
            pointer_x,
        }
    }
}

/// An active drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    pub mode: DragMode,
    pub clip_id: ClipId,
    pub origin: DragOrigin,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// Drives the drag state machine against a project.
#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    pub fn active_mode(&self) -> Option<DragMode> {
        match &self.state {
            InteractionState::Dragging(drag) => Some(drag.mode),
            InteractionState::Idle => None,
        }
    }

    /// Pointer pressed on a clip body or handle.
    ///
    /// Always selects the clip. A drag only begins from `Idle`; returns
    /// whether one began.
    pub fn pointer_down(
        &mut self,
        project: &mut Project,
        clip_id: &ClipId,
        mode: DragMode,
        pointer_x: f64,
    ) -> bool {
        if !project.select(clip_id) {
            return false;
        }
        if self.is_dragging() {
            return false;
        }
        let Some(clip) = project.clip(clip_id) else {
            return false;
        };
        let origin = DragOrigin::capture(clip, pointer_x);
        debug!(clip = %clip_id, ?mode, start = origin.start, "Drag started");
        self.state = InteractionState::Dragging(Drag {
            mode,
            clip_id: clip_id.clone(),
            origin,
        });
        true
    }

    /// Pointer moved. Returns true when the model changed.
    ///
    /// `fine` bypasses snapping for this frame only.
    pub fn pointer_move(
        &mut self,
        project: &mut Project,
        assets: &AssetLibrary,
        pointer_x: f64,
        fine: bool,
    ) -> bool {
        let InteractionState::Dragging(drag) = &self.state else {
            return false;
        };
        let delta = project.time_scale().to_seconds(pointer_x - drag.origin.pointer_x);
        let snap = project.snap();
        let Some(clip) = project.clip_mut(&drag.clip_id) else {
            return false;
        };
        apply_drag(clip, drag.mode, &drag.origin, delta, &snap, fine);
        normalize(clip, assets);
        debug!(
            clip = %drag.clip_id,
            mode = ?drag.mode,
            delta,
            start = clip.start(),
            duration = clip.duration(),
            "Drag frame"
        );
        true
    }

    /// Pointer released anywhere. Ends the gesture, keeping the last frame.
    pub fn pointer_up(&mut self) -> Option<ClipId> {
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(drag) => {
                debug!(clip = %drag.clip_id, mode = ?drag.mode, "Drag ended");
                Some(drag.clip_id)
            }
            InteractionState::Idle => None,
        }
    }
}

/// Apply one drag frame to `clip` from the pointer-down snapshot.
///
/// `delta` is the pointer travel in seconds since pointer-down.
pub fn apply_drag(
    clip: &mut Clip,
    mode: DragMode,
    origin: &DragOrigin,
    delta: f64,
    snap: &SnapGrid,
    fine: bool,
) {
    let q = |value: f64| snap.quantize(value, fine);
    match (mode, clip) {
        (DragMode::Move, Clip::Media(media)) => {
            media.start = q(origin.start + delta).max(0.0);
        }
        (DragMode::Move, Clip::Text(text)) => {
            let span = origin.end - origin.start;
            text.start = q(origin.start + delta).max(0.0);
            text.end = text.start + span;
        }
        (DragMode::TrimLeft, Clip::Media(media)) => {
            let right_edge = origin.start + origin.duration;
            let start = q(origin.start + delta)
                .max(0.0)
                .min(right_edge - MIN_MEDIA_DURATION);
            let shift = start - origin.start;
            media.start = start;
            media.duration = right_edge - start;
            media.in_point = (origin.in_point + shift).max(0.0);
        }
        (DragMode::TrimLeft, Clip::Text(text)) => {
            text.start = q(origin.start + delta).max(0.0).min(origin.end - MIN_TEXT_SPAN);
        }
        (DragMode::TrimRight, Clip::Media(media)) => {
            media.duration = q(origin.duration + delta).max(MIN_MEDIA_DURATION);
        }
        (DragMode::TrimRight, Clip::Text(text)) => {
            text.end = q(origin.end + delta).max(text.start + MIN_TEXT_SPAN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutdeck_timeline::{Asset, AssetKind, CaptionRequest, TrackKind};

    fn library() -> AssetLibrary {
        [Asset {
            id: "beach".into(),
            name: "beach.mp4".into(),
            kind: AssetKind::Video,
            duration: 10.0,
            has_video: true,
            has_audio: true,
            size_bytes: 0,
        }]
        .into_iter()
        .collect()
    }

    fn setup() -> (Project, AssetLibrary, ClipId) {
        let assets = library();
        let mut project = Project::default();
        let id = project
            .add_media_clip(TrackKind::Video, 0, "beach", &assets)
            .unwrap();
        (project, assets, id)
    }

    fn media(project: &Project, id: &ClipId) -> cutdeck_timeline::MediaClip {
        project.clip(id).and_then(Clip::as_media).unwrap().clone()
    }

    #[test]
    fn test_trim_right_by_pixels() {
        let (mut project, assets, id) = setup();
        let mut interaction = Interaction::new();
        assert!(interaction.pointer_down(&mut project, &id, DragMode::TrimRight, 720.0));
        interaction.pointer_move(&mut project, &assets, 270.0, false);
        interaction.pointer_up();
        let clip = media(&project, &id);
        assert!((clip.duration - 3.0).abs() < 1e-9);
        assert_eq!(clip.start, 0.0);
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn test_move_snaps_unless_fine() {
        let (mut project, assets, id) = setup();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut project, &id, DragMode::Move, 0.0);

        interaction.pointer_move(&mut project, &assets, 100.0, false);
        assert_eq!(media(&project, &id).start, 1.0);

        interaction.pointer_move(&mut project, &assets, 100.0, true);
        assert!((media(&project, &id).start - 100.0 / 90.0).abs() < 1e-9);

        interaction.pointer_move(&mut project, &assets, -500.0, false);
        assert_eq!(media(&project, &id).start, 0.0);
    }

    #[test]
    fn test_frames_are_snapshot_relative() {
        let (mut project, assets, id) = setup();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut project, &id, DragMode::Move, 0.0);
        for _ in 0..5 {
            interaction.pointer_move(&mut project, &assets, 180.0, false);
        }
        assert_eq!(media(&project, &id).start, 2.0);
    }

    #[test]
    fn test_trim_left_keeps_source_alignment() {
        let (mut project, assets, id) = setup();
        let before = media(&project, &id);
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut project, &id, DragMode::TrimLeft, 0.0);
        interaction.pointer_move(&mut project, &assets, 135.0, false);
        interaction.pointer_up();

        let after = media(&project, &id);
        assert_eq!(after.start, 1.5);
        assert!(((after.in_point - before.in_point) - (after.start - before.start)).abs() < 1e-9);
        assert!((after.end() - before.end()).abs() < 1e-9);
    }

    #[test]
    fn test_trim_left_stops_before_right_edge() {
        let (mut project, assets, id) = setup();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut project, &id, DragMode::TrimLeft, 0.0);
        interaction.pointer_move(&mut project, &assets, 5000.0, false);
        let clip = media(&project, &id);
        assert!((clip.duration - MIN_MEDIA_DURATION).abs() < 1e-9);
        assert!((clip.end() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_move_carries_end() {
        let assets = library();
        let mut project = Project::default();
        let id = project.add_caption(CaptionRequest::new("Hi", 1.0, 3.0)).unwrap();
        let mut interaction = Interaction::new();
        interaction.pointer_down(&mut project, &id, DragMode::Move, 0.0);
        interaction.pointer_move(&mut project, &assets, 90.0, false);
        let text = project.clip(&id).and_then(Clip::as_text).unwrap();
        assert_eq!(text.start, 2.0);
        assert_eq!(text.end, 4.0);
    }

    #[test]
    fn test_text_trims() {
        let assets = library();
        let mut project = Project::default();
        let id = project.add_caption(CaptionRequest::new("Hi", 1.0, 3.0)).unwrap();
        let mut interaction = Interaction::new();

        interaction.pointer_down(&mut project, &id, DragMode::TrimLeft, 0.0);
        interaction.pointer_move(&mut project, &assets, 900.0, false);
        interaction.pointer_up();
        let text = project.clip(&id).and_then(Clip::as_text).unwrap().clone();
        assert!((text.start - 2.95).abs() < 1e-9);
        assert!((text.end - 3.0).abs() < 1e-9);

        interaction.pointer_down(&mut project, &id, DragMode::TrimRight, 0.0);
        interaction.pointer_move(&mut project, &assets, -900.0, false);
        let text = project.clip(&id).and_then(Clip::as_text).unwrap();
        assert!((text.end - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_down_selects_but_does_not_restart() {
        let (mut project, assets, first) = setup();
        let second = project
            .add_media_clip(TrackKind::Video, 0, "beach", &assets)
            .unwrap();
        let mut interaction = Interaction::new();
        assert!(interaction.pointer_down(&mut project, &first, DragMode::Move, 0.0));
        assert!(!interaction.pointer_down(&mut project, &second, DragMode::Move, 0.0));
        assert!(project.is_selected(&second));
        assert_eq!(interaction.pointer_up(), Some(first));
        assert_eq!(interaction.pointer_up(), None);
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let (mut project, assets, _) = setup();
        let mut interaction = Interaction::new();
        assert!(!interaction.pointer_move(&mut project, &assets, 50.0, false));
    }

    #[test]
    fn test_cursor_per_mode() {
        assert_eq!(DragMode::TrimLeft.cursor(), CursorIcon::ResizeWest);
        assert_eq!(DragMode::TrimRight.cursor(), CursorIcon::ResizeEast);
    }
}
