//! Editing flows across the model and the pointer state machine.

use cutdeck_core::EditorConfig;
use cutdeck_timeline::{
    Asset, AssetKind, AssetLibrary, CaptionRequest, ClipId, ClipUpdate, EditError, Project,
    TrackKind, SPLIT_MARGIN,
};
use cutdeck_ui::{DragMode, Interaction};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────

fn video(id: &str, duration: f64) -> Asset {
    Asset {
        id: id.into(),
        name: format!("{id}.mp4"),
        kind: AssetKind::Video,
        duration,
        has_video: true,
        has_audio: true,
        size_bytes: 0,
    }
}

fn library() -> AssetLibrary {
    [video("beach", 4.0), video("city", 12.0)].into_iter().collect()
}

fn project() -> Project {
    Project::new(&EditorConfig::default())
}

fn media(project: &Project, id: &ClipId) -> cutdeck_timeline::MediaClip {
    project.clip(id).and_then(|c| c.as_media()).cloned().unwrap()
}

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

// ── Adding ─────────────────────────────────────────────────────

#[test]
fn clips_append_at_track_end() {
    let assets = library();
    let mut p = project();
    let first = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let second = p.add_media_clip(TrackKind::Video, 0, "city", &assets).unwrap();

    approx(media(&p, &first).start, 0.0);
    approx(media(&p, &second).start, 4.0);
    // Long assets are capped at the default clip length.
    approx(media(&p, &second).duration, 8.0);
    assert!(p.is_selected(&second));
}

#[test]
fn captions_land_on_first_text_track() {
    let mut p = project();
    p.add_track(TrackKind::Text);
    let id = p.add_caption(CaptionRequest::new("Hello", 1.0, 3.0)).unwrap();
    assert_eq!(p.tracks(TrackKind::Text)[0].clip_count(), 1);
    assert_eq!(p.tracks(TrackKind::Text)[1].clip_count(), 0);
    assert_eq!(p.selection().map(|s| s.lane), Some(TrackKind::Text));
    assert!(p.is_selected(&id));
}

#[test]
fn empty_caption_is_refused() {
    let mut p = project();
    assert_eq!(
        p.add_caption(CaptionRequest::new("   ", 0.0, 2.0)),
        Err(EditError::EmptyCaption)
    );
    assert_eq!(p.clip_count(), 0);
}

// ── Dragging ───────────────────────────────────────────────────

#[test]
fn trim_left_snaps_and_moves_in_point() {
    let assets = library();
    let mut p = project();
    p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let id = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    p.set_snap_enabled(true);
    assert!(p.set_snap_step(0.5));

    let scale = p.time_scale();
    let x0 = scale.to_px(4.0);
    let mut drag = Interaction::new();
    assert!(drag.pointer_down(&mut p, &id, DragMode::TrimLeft, x0));

    assert!(drag.pointer_move(&mut p, &assets, x0 + scale.to_px(1.1), false));
    let clip = media(&p, &id);
    approx(clip.start, 5.0);
    approx(clip.duration, 3.0);
    approx(clip.in_point, 1.0);

    // Fine drag bypasses the grid for this frame only.
    drag.pointer_move(&mut p, &assets, x0 + scale.to_px(1.1), true);
    let clip = media(&p, &id);
    assert!((clip.start - 5.1).abs() < 1e-6);
    assert!((clip.start + clip.duration - 8.0).abs() < 1e-6);

    assert_eq!(drag.pointer_up(), Some(id));
    assert!(!drag.is_dragging());
}

#[test]
fn add_then_trim_right_to_three_seconds() {
    let assets: AssetLibrary = [video("long", 10.0)].into_iter().collect();
    let mut p = project();
    p.set_zoom(90.0);
    let id = p.add_media_clip(TrackKind::Video, 0, "long", &assets).unwrap();
    approx(media(&p, &id).start, 0.0);
    approx(media(&p, &id).duration, 8.0);

    let right_edge = 8.0 * 90.0;
    let mut drag = Interaction::new();
    assert!(drag.pointer_down(&mut p, &id, DragMode::TrimRight, right_edge));
    drag.pointer_move(&mut p, &assets, right_edge - 450.0, false);
    drag.pointer_up();

    let clip = media(&p, &id);
    let step = p.snap().step;
    assert!((clip.duration - 3.0).abs() <= step / 2.0 + 1e-9);
    approx(clip.start, 0.0);
    approx(clip.in_point, 0.0);
}

#[test]
fn trim_left_keeps_source_aligned() {
    let assets = library();
    let mut p = project();
    let id = p.add_media_clip(TrackKind::Video, 0, "city", &assets).unwrap();
    let before = media(&p, &id);
    let scale = p.time_scale();

    let mut drag = Interaction::new();
    drag.pointer_down(&mut p, &id, DragMode::TrimLeft, 0.0);
    drag.pointer_move(&mut p, &assets, scale.to_px(2.3), true);
    drag.pointer_up();

    let after = media(&p, &id);
    assert!(((after.in_point - before.in_point) - (after.start - before.start)).abs() < 1e-9);
    assert!((after.end() - before.end()).abs() < 1e-9);
}

#[test]
fn trim_right_is_capped_by_source_length() {
    let assets = library();
    let mut p = project();
    let id = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let scale = p.time_scale();
    let x0 = scale.to_px(4.0);

    let mut drag = Interaction::new();
    drag.pointer_down(&mut p, &id, DragMode::TrimRight, x0);
    drag.pointer_move(&mut p, &assets, x0 + scale.to_px(3.0), true);
    drag.pointer_up();

    approx(media(&p, &id).duration, 4.0);
}

#[test]
fn move_never_goes_before_zero() {
    let assets = library();
    let mut p = project();
    let id = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let scale = p.time_scale();

    let mut drag = Interaction::new();
    drag.pointer_down(&mut p, &id, DragMode::Move, 100.0);
    drag.pointer_move(&mut p, &assets, 100.0 - scale.to_px(10.0), false);
    drag.pointer_up();

    approx(media(&p, &id).start, 0.0);
}

#[test]
fn field_update_is_normalized() {
    let assets = library();
    let mut p = project();
    let id = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let update = ClipUpdate::parse(TrackKind::Video, "transition_in", "9").unwrap();
    p.update_clip(&id, update, &assets).unwrap();
    approx(media(&p, &id).transition_in, 2.0);

    let update = ClipUpdate::parse(TrackKind::Video, "duration", "not a number").unwrap();
    p.update_clip(&id, update, &assets).unwrap();
    let clip = media(&p, &id);
    approx(clip.duration, 0.1);
    assert!(clip.transition_in <= clip.duration / 2.0);
}

// ── Splitting ──────────────────────────────────────────────────

#[test]
fn split_near_edge_is_rejected() {
    let assets = library();
    let mut p = project();
    let id = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let before = media(&p, &id);

    let err = p.split_clip(&id, 3.98, &assets).unwrap_err();
    assert!(matches!(err, EditError::InvalidSplitOffset { .. }));
    assert_eq!(media(&p, &id), before);
    assert_eq!(p.clip_count(), 1);
}

#[test]
fn split_caption_is_rejected() {
    let assets = library();
    let mut p = project();
    let id = p.add_caption(CaptionRequest::new("Hi", 0.0, 2.0)).unwrap();
    assert_eq!(p.split_clip(&id, 1.0, &assets), Err(EditError::SplitTextClip));
}

#[test]
fn remove_clears_selection() {
    let assets = library();
    let mut p = project();
    let id = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    p.remove_clip(&id).unwrap();
    assert!(p.selection().is_none());
    assert_eq!(p.clip_count(), 0);
}

proptest! {
    #[test]
    fn split_preserves_coverage(length in 1.0f64..8.0, fraction in 0.01f64..0.99) {
        let assets: AssetLibrary = [video("a", length)].into_iter().collect();
        let mut p = project();
        let head_id = p.add_media_clip(TrackKind::Video, 0, "a", &assets).unwrap();
        let original = media(&p, &head_id);
        let offset = SPLIT_MARGIN + fraction * (original.duration - 2.0 * SPLIT_MARGIN);
        prop_assume!(offset > SPLIT_MARGIN && offset < original.duration - SPLIT_MARGIN);

        let tail_id = p.split_clip(&head_id, offset, &assets).unwrap();
        let head = media(&p, &head_id);
        let tail = media(&p, &tail_id);

        prop_assert!((head.duration + tail.duration - original.duration).abs() < 1e-9);
        prop_assert!((tail.start - head.end()).abs() < 1e-9);
        prop_assert!((tail.in_point - (original.in_point + offset)).abs() < 1e-9);
        prop_assert!((tail.source_out() - original.source_out()).abs() < 1e-9);
        prop_assert_eq!(p.clip_count(), 2);
    }
}
