//! Clip normalization.
//!
//! Every creation, field update, split and drag frame ends with a call to
//! [`normalize`]. Out-of-range values are clamped, never rejected, and a
//! second pass over an already-normalized clip changes nothing.

use cutdeck_core::finite_or;

use crate::asset::AssetLibrary;
use crate::clip::{Clip, MediaClip, TextClip};

/// Shortest media clip, in seconds.
pub const MIN_MEDIA_DURATION: f64 = 0.1;
/// Shortest caption span, in seconds.
pub const MIN_TEXT_SPAN: f64 = 0.05;
/// Smallest caption font size.
pub const MIN_FONT_SIZE: u32 = 10;
/// Caption length used when `end` is not a number.
pub const DEFAULT_TEXT_SPAN: f64 = 2.0;

/// Normalize a clip in place, looking up asset durations in `assets`.
///
/// A media clip whose asset is missing from the library is still
/// normalized; only the source-length cap is skipped.
pub fn normalize(clip: &mut Clip, assets: &AssetLibrary) {
    match clip {
        Clip::Media(media) => {
            let asset_duration = assets.duration_of(&media.asset_id);
            normalize_media(media, asset_duration);
        }
        Clip::Text(text) => normalize_text(text),
    }
}

/// Normalize a media clip against an optional known asset duration.
pub fn normalize_media(clip: &mut MediaClip, asset_duration: Option<f64>) {
    clip.start = finite_or(clip.start, 0.0).max(0.0);
    clip.in_point = finite_or(clip.in_point, 0.0).max(0.0);
    clip.duration = finite_or(clip.duration, MIN_MEDIA_DURATION).max(MIN_MEDIA_DURATION);
    clip.volume = finite_or(clip.volume, 1.0).max(0.0);

    if let Some(total) = asset_duration.filter(|d| d.is_finite() && *d > 0.0) {
        let available = total - clip.in_point;
        if clip.duration > available {
            clip.duration = available.max(MIN_MEDIA_DURATION);
        }
    }

    // Capped against the final duration so a shortened clip stays stable.
    let cap = clip.duration / 2.0;
    clip.transition_in = finite_or(clip.transition_in, 0.0).max(0.0).min(cap);
    clip.transition_out = finite_or(clip.transition_out, 0.0).max(0.0).min(cap);
}

/// Normalize a caption clip.
pub fn normalize_text(clip: &mut TextClip) {
    clip.start = finite_or(clip.start, 0.0).max(0.0);
    clip.end = finite_or(clip.end, clip.start + DEFAULT_TEXT_SPAN).max(clip.start + MIN_TEXT_SPAN);
    clip.font_size = clip.font_size.max(MIN_FONT_SIZE);
    if clip.color.trim().is_empty() {
        clip.color = TextClip::DEFAULT_COLOR.to_string();
    }
    clip.x = finite_or(clip.x, TextClip::DEFAULT_X);
    clip.y = finite_or(clip.y, TextClip::DEFAULT_Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipId;
    use proptest::prelude::*;

    fn media(in_point: f64, duration: f64) -> MediaClip {
        MediaClip {
            id: ClipId::new("clip-1"),
            asset_id: "a".into(),
            start: 0.0,
            in_point,
            duration,
            transition_in: 0.0,
            transition_out: 0.0,
            volume: 1.0,
        }
    }

    fn text(start: f64, end: f64) -> TextClip {
        TextClip {
            id: ClipId::new("clip-2"),
            text: "Title".into(),
            start,
            end,
            font_size: 42,
            color: "white".into(),
            x: 40.0,
            y: 640.0,
        }
    }

    #[test]
    fn test_duration_capped_by_asset() {
        let mut clip = media(4.0, 3.0);
        normalize_media(&mut clip, Some(5.0));
        assert!((clip.duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_asset_duration_skips_cap() {
        let mut clip = media(4.0, 3.0);
        normalize_media(&mut clip, None);
        assert_eq!(clip.duration, 3.0);
        normalize_media(&mut clip, Some(0.0));
        assert_eq!(clip.duration, 3.0);
    }

    #[test]
    fn test_media_floors() {
        let mut clip = media(-2.0, 0.0);
        clip.start = -1.0;
        clip.volume = -0.5;
        clip.transition_in = -1.0;
        normalize_media(&mut clip, None);
        assert_eq!(clip.start, 0.0);
        assert_eq!(clip.in_point, 0.0);
        assert_eq!(clip.duration, MIN_MEDIA_DURATION);
        assert_eq!(clip.volume, 0.0);
        assert_eq!(clip.transition_in, 0.0);
    }

    #[test]
    fn test_transitions_capped_at_half_final_duration() {
        let mut clip = media(4.0, 3.0);
        clip.transition_in = 1.4;
        clip.transition_out = 9.0;
        normalize_media(&mut clip, Some(5.0));
        assert!((clip.transition_in - 0.5).abs() < 1e-9);
        assert!((clip.transition_out - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_media_fields() {
        let mut clip = media(f64::NAN, f64::INFINITY);
        clip.volume = f64::NAN;
        normalize_media(&mut clip, None);
        assert_eq!(clip.in_point, 0.0);
        assert_eq!(clip.duration, MIN_MEDIA_DURATION);
        assert_eq!(clip.volume, 1.0);
    }

    #[test]
    fn test_text_span_floor() {
        let mut clip = text(3.0, 1.0);
        normalize_text(&mut clip);
        assert!((clip.end - 3.05).abs() < 1e-9);
    }

    #[test]
    fn test_text_defaults() {
        let mut clip = text(-1.0, f64::NAN);
        clip.font_size = 4;
        clip.color = "  ".into();
        clip.x = f64::NAN;
        normalize_text(&mut clip);
        assert_eq!(clip.start, 0.0);
        assert_eq!(clip.end, DEFAULT_TEXT_SPAN);
        assert_eq!(clip.font_size, MIN_FONT_SIZE);
        assert_eq!(clip.color, "white");
        assert_eq!(clip.x, TextClip::DEFAULT_X);
    }

    #[test]
    fn test_missing_asset_tolerated() {
        let mut clip = Clip::Media(media(0.0, 50.0));
        normalize(&mut clip, &AssetLibrary::new());
        assert_eq!(clip.duration(), 50.0);
    }

    fn any_f64() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => -50.0f64..50.0,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
        ]
    }

    proptest! {
        #[test]
        fn media_normalize_is_idempotent(
            start in any_f64(),
            in_point in any_f64(),
            duration in any_f64(),
            t_in in any_f64(),
            t_out in any_f64(),
            volume in any_f64(),
            asset in prop::option::of(0.0f64..30.0),
        ) {
            let mut clip = media(in_point, duration);
            clip.start = start;
            clip.transition_in = t_in;
            clip.transition_out = t_out;
            clip.volume = volume;
            normalize_media(&mut clip, asset);
            let once = clip.clone();
            normalize_media(&mut clip, asset);
            prop_assert_eq!(once, clip);
        }

        #[test]
        fn text_normalize_is_idempotent(
            start in any_f64(),
            end in any_f64(),
            font_size in 0u32..200,
        ) {
            let mut clip = text(start, end);
            clip.font_size = font_size;
            normalize_text(&mut clip);
            let once = clip.clone();
            normalize_text(&mut clip);
            prop_assert_eq!(once, clip);
        }
    }
}
