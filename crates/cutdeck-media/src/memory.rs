//! In-process backend for offline sessions and tests.

use std::collections::HashMap;
use std::path::Path;

use cutdeck_timeline::{Asset, AssetKind, ExportPayload};
use parking_lot::Mutex;

use crate::backend::EditorBackend;
use crate::error::BackendError;
use crate::wire::ExportReceipt;

#[derive(Debug, Default)]
struct State {
    assets: Vec<Asset>,
    blobs: HashMap<String, Vec<u8>>,
    exports: Vec<ExportPayload>,
    reject_exports: Option<String>,
    next_id: u64,
}

/// Backend that keeps everything in memory.
///
/// Uploaded files become assets of unknown duration, classified by file
/// extension. Submitted payloads are recorded for inspection.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an asset together with its raw bytes.
    pub fn insert_asset(&self, asset: Asset, bytes: Vec<u8>) {
        let mut state = self.state.lock();
        state.blobs.insert(asset.id.clone(), bytes);
        state.assets.push(asset);
    }

    /// Make every following export fail with `detail`.
    pub fn reject_exports(&self, detail: impl Into<String>) {
        self.state.lock().reject_exports = Some(detail.into());
    }

    /// Payloads submitted so far.
    pub fn exports(&self) -> Vec<ExportPayload> {
        self.state.lock().exports.clone()
    }
}

fn kind_for(file_name: &str) -> Option<AssetKind> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)?;
    match ext.as_str() {
        "mp4" | "mov" | "mkv" | "webm" => Some(AssetKind::Video),
        "mp3" | "wav" | "aac" | "m4a" | "flac" | "ogg" => Some(AssetKind::Audio),
        "png" | "jpg" | "jpeg" | "webp" => Some(AssetKind::Image),
        _ => None,
    }
}

impl EditorBackend for InMemoryBackend {
    async fn list_assets(&self) -> Result<Vec<Asset>, BackendError> {
        Ok(self.state.lock().assets.clone())
    }

    async fn upload_asset(&self, file_name: &str, bytes: Vec<u8>) -> Result<Asset, BackendError> {
        if bytes.is_empty() {
            return Err(BackendError::from_response(
                400,
                r#"{"detail": "Uploaded file is empty"}"#,
            ));
        }
        let kind = kind_for(file_name).ok_or_else(|| {
            BackendError::from_response(400, r#"{"detail": "Unsupported media type"}"#)
        })?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let asset = Asset {
            id: format!("asset-{}", state.next_id),
            name: file_name.to_string(),
            kind,
            duration: 0.0,
            has_video: matches!(kind, AssetKind::Video | AssetKind::Image),
            has_audio: matches!(kind, AssetKind::Video | AssetKind::Audio),
            size_bytes: bytes.len() as u64,
        };
        state.blobs.insert(asset.id.clone(), bytes);
        state.assets.push(asset.clone());
        Ok(asset)
    }

    async fn asset_bytes(&self, asset_id: &str) -> Result<Vec<u8>, BackendError> {
        self.state
            .lock()
            .blobs
            .get(asset_id)
            .cloned()
            .ok_or_else(|| BackendError::from_response(404, r#"{"detail": "Asset not found"}"#))
    }

    async fn submit_export(&self, payload: &ExportPayload) -> Result<ExportReceipt, BackendError> {
        let mut state = self.state.lock();
        if let Some(detail) = &state.reject_exports {
            return Err(BackendError::Status {
                status: 400,
                detail: detail.clone(),
            });
        }
        let duration = payload
            .video_tracks
            .iter()
            .chain(payload.audio_tracks.iter())
            .flat_map(|t| t.clips.iter())
            .map(|c| c.start + c.duration)
            .chain(payload.text_tracks.iter().flat_map(|t| t.clips.iter()).map(|c| c.end))
            .fold(0.0, f64::max);
        state.exports.push(payload.clone());
        state.next_id += 1;
        let export_id = format!("export-{}", state.next_id);
        Ok(ExportReceipt {
            download_url: format!("/editor/exports/{export_id}/download"),
            export_id,
            duration,
        })
    }

    async fn export_bytes(&self, export_id: &str) -> Result<Vec<u8>, BackendError> {
        let state = self.state.lock();
        let index = export_id
            .strip_prefix("export-")
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|n| *n <= state.next_id);
        match index {
            Some(_) => Ok(Vec::new()),
            None => Err(BackendError::from_response(404, r#"{"detail": "Export not found"}"#)),
        }
    }
}
