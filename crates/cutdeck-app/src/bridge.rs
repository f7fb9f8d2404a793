//! Runs backend calls on a tokio runtime and hands results back to the UI thread.
//!
//! Every task reports through a crossbeam channel drained once per frame,
//! then requests a render so the result is painted promptly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use cutdeck_audio::{waveform_from_bytes, WaveformCache};
use cutdeck_media::{
    submit_export, upload_files, BackendError, EditorBackend, ExportError, ExportReceipt,
    ExportTicket, HttpBackend, InMemoryBackend, UploadOutcome,
};
use cutdeck_timeline::{Asset, ExportPayload};
use cutdeck_ui::RenderScheduler;
use tracing::{info, warn};

/// Result of a background task.
#[derive(Debug)]
pub enum BridgeEvent {
    Assets(Result<Vec<Asset>, BackendError>),
    Uploaded(Vec<UploadOutcome>),
    /// The waveform cache entry for this asset was resolved.
    WaveformResolved(String),
    Exported(Result<ExportReceipt, ExportError>),
    Saved(Result<PathBuf, BackendError>),
}

/// Backend selected at startup.
pub enum AppBackend {
    Http(HttpBackend),
    Offline(InMemoryBackend),
}

impl EditorBackend for AppBackend {
    async fn list_assets(&self) -> Result<Vec<Asset>, BackendError> {
        match self {
            Self::Http(b) => b.list_assets().await,
            Self::Offline(b) => b.list_assets().await,
        }
    }

    async fn upload_asset(&self, file_name: &str, bytes: Vec<u8>) -> Result<Asset, BackendError> {
        match self {
            Self::Http(b) => b.upload_asset(file_name, bytes).await,
            Self::Offline(b) => b.upload_asset(file_name, bytes).await,
        }
    }

    async fn asset_bytes(&self, asset_id: &str) -> Result<Vec<u8>, BackendError> {
        match self {
            Self::Http(b) => b.asset_bytes(asset_id).await,
            Self::Offline(b) => b.asset_bytes(asset_id).await,
        }
    }

    async fn submit_export(&self, payload: &ExportPayload) -> Result<ExportReceipt, BackendError> {
        match self {
            Self::Http(b) => b.submit_export(payload).await,
            Self::Offline(b) => b.submit_export(payload).await,
        }
    }

    async fn export_bytes(&self, export_id: &str) -> Result<Vec<u8>, BackendError> {
        match self {
            Self::Http(b) => b.export_bytes(export_id).await,
            Self::Offline(b) => b.export_bytes(export_id).await,
        }
    }
}

pub struct Bridge {
    runtime: tokio::runtime::Runtime,
    backend: Arc<AppBackend>,
    waveforms: WaveformCache,
    scheduler: RenderScheduler,
    tx: Sender<BridgeEvent>,
    rx: Receiver<BridgeEvent>,
}

impl Bridge {
    pub fn new(backend: AppBackend, scheduler: RenderScheduler) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("cutdeck-io")
            .enable_all()
            .build()?;
        let (tx, rx) = crossbeam_channel::unbounded();
        Ok(Self {
            runtime,
            backend: Arc::new(backend),
            waveforms: WaveformCache::new(),
            scheduler,
            tx,
            rx,
        })
    }

    pub fn waveforms(&self) -> &WaveformCache {
        &self.waveforms
    }

    /// Events that arrived since the last call.
    pub fn drain(&self) -> Vec<BridgeEvent> {
        self.rx.try_iter().collect()
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = BridgeEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let scheduler = self.scheduler.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if tx.send(event).is_err() {
                warn!("UI closed before a background result arrived");
            }
            scheduler.request();
        });
    }

    pub fn refresh_assets(&self) {
        let backend = Arc::clone(&self.backend);
        self.spawn(async move { BridgeEvent::Assets(backend.list_assets().await) });
    }

    /// Read and upload local files one by one.
    pub fn upload(&self, paths: Vec<PathBuf>) {
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let mut readable = Vec::new();
            let mut unreadable = Vec::new();
            for path in paths {
                let file_name = display_name(&path);
                match tokio::task::spawn_blocking(move || std::fs::read(&path)).await {
                    Ok(Ok(bytes)) => readable.push((file_name, bytes)),
                    Ok(Err(e)) => unreadable.push(read_failure(file_name, e.to_string())),
                    Err(e) => unreadable.push(read_failure(file_name, e.to_string())),
                }
            }
            let mut outcomes = upload_files(backend.as_ref(), readable).await;
            outcomes.extend(unreadable);
            BridgeEvent::Uploaded(outcomes)
        });
    }

    /// Decode the waveform of `asset_id` unless a decode already ran or is running.
    pub fn fetch_waveform(&self, asset_id: String, extension: Option<String>) {
        if !self.waveforms.begin(&asset_id) {
            return;
        }
        let backend = Arc::clone(&self.backend);
        let cache = self.waveforms.clone();
        self.spawn(async move {
            let waveform = match backend.asset_bytes(&asset_id).await {
                Ok(bytes) => {
                    let id = asset_id.clone();
                    let decode = move || waveform_from_bytes(&id, bytes, extension.as_deref());
                    tokio::task::spawn_blocking(decode).await.unwrap_or_else(|e| {
                        warn!(asset = %asset_id, error = %e, "Waveform task failed");
                        None
                    })
                }
                Err(e) => {
                    warn!(asset = %asset_id, error = %e, "Could not fetch asset bytes");
                    None
                }
            };
            cache.resolve(&asset_id, waveform);
            BridgeEvent::WaveformResolved(asset_id)
        });
    }

    /// Submit a prepared payload; the ticket is held until the reply.
    pub fn export(&self, payload: ExportPayload, ticket: ExportTicket) {
        let backend = Arc::clone(&self.backend);
        info!(clips = payload.clip_count(), "Submitting export");
        self.spawn(async move {
            BridgeEvent::Exported(submit_export(backend.as_ref(), &payload, ticket).await)
        });
    }

    /// Download a rendered export to `path`.
    pub fn download(&self, export_id: String, path: PathBuf) {
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            let result = match backend.export_bytes(&export_id).await {
                Ok(bytes) => {
                    let target = path.clone();
                    let write = move || std::fs::write(&target, bytes);
                    match tokio::task::spawn_blocking(write).await {
                        Ok(Ok(())) => Ok(path),
                        Ok(Err(e)) => Err(write_failure(&path, e.to_string())),
                        Err(e) => Err(write_failure(&path, e.to_string())),
                    }
                }
                Err(e) => Err(e),
            };
            BridgeEvent::Saved(result)
        });
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_failure(file_name: String, reason: String) -> UploadOutcome {
    let error = BackendError::ReadFile {
        path: file_name.clone(),
        reason,
    };
    UploadOutcome {
        file_name,
        result: Err(error.to_string()),
    }
}

fn write_failure(path: &Path, reason: String) -> BackendError {
    BackendError::WriteFile {
        path: path.display().to_string(),
        reason,
    }
}
