//! Waveform pipeline: backend bytes, decode, cache and timeline columns.

use std::sync::Arc;

use cutdeck_audio::{waveform_from_bytes, WaveformCache, WaveformState, DEFAULT_BINS};
use cutdeck_media::{EditorBackend, InMemoryBackend};
use cutdeck_timeline::{Asset, AssetKind};
use cutdeck_ui::timeline::waveform_columns;

use crate::ramp_wav;

fn voice() -> Asset {
    Asset {
        id: "voice".into(),
        name: "voice.wav".into(),
        kind: AssetKind::Audio,
        duration: 2.0,
        has_video: false,
        has_audio: true,
        size_bytes: 0,
    }
}

#[tokio::test]
async fn decode_once_then_serve_from_cache() {
    let backend = InMemoryBackend::new();
    backend.insert_asset(voice(), ramp_wav(16_000, 8_000));
    let cache = WaveformCache::new();

    assert!(cache.begin("voice"));
    assert!(!cache.begin("voice"));
    assert_eq!(cache.state("voice"), WaveformState::Pending);

    let bytes = backend.asset_bytes("voice").await.unwrap();
    cache.resolve("voice", waveform_from_bytes("voice", bytes, Some("wav")));

    let waveform = cache.get("voice").unwrap();
    assert_eq!(waveform.data.len(), DEFAULT_BINS);
    assert!((waveform.duration - 2.0).abs() < 1e-9);
    assert!(!cache.begin("voice"));
    assert!(Arc::ptr_eq(&waveform, &cache.get("voice").unwrap()));
}

#[tokio::test]
async fn missing_asset_is_a_permanent_failure() {
    let backend = InMemoryBackend::new();
    let cache = WaveformCache::new();

    assert!(cache.begin("ghost"));
    let waveform = match backend.asset_bytes("ghost").await {
        Ok(bytes) => waveform_from_bytes("ghost", bytes, None),
        Err(_) => None,
    };
    cache.resolve("ghost", waveform);

    assert_eq!(cache.state("ghost"), WaveformState::Resolved(None));
    assert!(cache.get("ghost").is_none());
    assert!(!cache.begin("ghost"));
}

#[test]
fn columns_follow_clip_in_point() {
    let waveform = waveform_from_bytes("voice", ramp_wav(16_000, 8_000), Some("wav")).unwrap();

    // 1 s of clip at 50 px/s starting halfway into the source.
    let columns = waveform_columns(&waveform, 1.0, 50.0, 50);
    assert_eq!(columns.len(), 50);
    assert!(columns.iter().all(Option::is_some));

    // Columns past the end of the source have no data.
    let overflow = waveform_columns(&waveform, 1.5, 50.0, 50);
    assert!(overflow[..25].iter().all(Option::is_some));
    assert!(overflow[25..].iter().all(Option::is_none));
}
