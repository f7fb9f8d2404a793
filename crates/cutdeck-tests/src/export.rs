//! Export validation, payload shape and submission.

use cutdeck_core::EditorConfig;
use cutdeck_media::{
    prepare_export, submit_export, BackendError, ExportError, ExportGuard, InMemoryBackend,
};
use cutdeck_timeline::{
    Asset, AssetKind, AssetLibrary, CaptionRequest, ClipUpdate, EditError, ExportSettings, Project,
    TrackKind,
};

fn assets() -> AssetLibrary {
    [
        Asset {
            id: "beach".into(),
            name: "beach.mp4".into(),
            kind: AssetKind::Video,
            duration: 4.0,
            has_video: true,
            has_audio: true,
            size_bytes: 0,
        },
        Asset {
            id: "voice".into(),
            name: "voice.wav".into(),
            kind: AssetKind::Audio,
            duration: 3.0,
            has_video: false,
            has_audio: true,
            size_bytes: 0,
        },
    ]
    .into_iter()
    .collect()
}

fn edited_project() -> Project {
    let assets = assets();
    let mut p = Project::new(&EditorConfig::default());
    let clip = p.add_media_clip(TrackKind::Video, 0, "beach", &assets).unwrap();
    let fade = ClipUpdate::parse(TrackKind::Video, "transition_out", "0.5").unwrap();
    p.update_clip(&clip, fade, &assets).unwrap();
    p.add_media_clip(TrackKind::Audio, 0, "voice", &assets).unwrap();
    let mut caption = CaptionRequest::new("Title", 0.0, 2.5);
    caption.x = 100.6;
    p.add_caption(caption).unwrap();
    p
}

#[test]
fn audio_only_project_is_refused_without_claiming() {
    let assets = assets();
    let mut p = Project::new(&EditorConfig::default());
    p.add_media_clip(TrackKind::Audio, 0, "voice", &assets).unwrap();

    let guard = ExportGuard::new();
    let err = prepare_export(&guard, &p, &ExportSettings::default()).unwrap_err();
    assert_eq!(err, ExportError::Rejected(EditError::NothingToExport));
    assert!(!guard.is_busy());
}

#[test]
fn payload_matches_wire_shape() {
    let p = edited_project();
    let settings = ExportSettings {
        width: 100,
        fps: 90,
        ..Default::default()
    };
    let payload = p.export_payload(&settings.sanitized()).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&payload.to_json().unwrap()).unwrap();

    assert_eq!(json["width"], 320);
    assert_eq!(json["height"], 720);
    assert_eq!(json["fps"], 60);
    assert_eq!(json["bg_color"], "black");

    let video = &json["video_tracks"][0]["clips"][0];
    assert_eq!(video["asset_id"], "beach");
    assert_eq!(video["duration"], 4.0);
    assert_eq!(video["transition_out"], 0.5);
    assert_eq!(json["audio_tracks"][0]["clips"][0]["asset_id"], "voice");

    let caption = &json["text_tracks"][0]["clips"][0];
    assert_eq!(caption["text"], "Title");
    assert_eq!(caption["x"], 101);
    assert!(caption["end"].as_f64().unwrap() > caption["start"].as_f64().unwrap());
    assert_eq!(payload.clip_count(), 3);
}

#[tokio::test]
async fn export_is_single_flight() {
    let backend = InMemoryBackend::new();
    let guard = ExportGuard::new();
    let p = edited_project();

    let (payload, ticket) = prepare_export(&guard, &p, &ExportSettings::default()).unwrap();
    assert!(guard.is_busy());
    assert_eq!(
        prepare_export(&guard, &p, &ExportSettings::default()).unwrap_err(),
        ExportError::InFlight
    );

    let receipt = submit_export(&backend, &payload, ticket).await.unwrap();
    assert!(!guard.is_busy());
    assert!((receipt.duration - 4.0).abs() < 1e-9);
    assert_eq!(backend.exports(), vec![payload]);
}

#[tokio::test]
async fn rejected_export_releases_guard() {
    let backend = InMemoryBackend::new();
    backend.reject_exports("Asset missing on server");
    let guard = ExportGuard::new();

    let (payload, ticket) =
        prepare_export(&guard, &edited_project(), &ExportSettings::default()).unwrap();
    let err = submit_export(&backend, &payload, ticket).await.unwrap_err();
    assert_eq!(
        err,
        ExportError::Backend(BackendError::Status {
            status: 400,
            detail: "Asset missing on server".into(),
        })
    );
    assert!(!guard.is_busy());
}
