//! Editing session: the project, the asset listing and the status line.
//!
//! Panels report what the user did; [`Session`] applies it to the model and
//! returns the background work the app shell should start.

use std::path::Path;

use cutdeck_media::{prepare_export, summarize_uploads, ExportGuard, ExportReceipt, ExportTicket};
use cutdeck_timeline::{AssetLibrary, ExportPayload, ExportSettings, Project};
use cutdeck_ui::{InspectorAction, MediaBrowserAction, TimelineAction};
use tracing::{debug, info, warn};

use crate::bridge::BridgeEvent;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// Work for the app shell after an action.
#[derive(Debug)]
pub enum Effect {
    RefreshAssets,
    /// Open a file picker and upload the chosen files.
    PickUploads,
    FetchWaveform {
        asset_id: String,
        extension: Option<String>,
    },
    Export(ExportPayload, ExportTicket),
    /// Ask where to save a rendered export.
    PickDownload { export_id: String },
}

pub struct Session {
    pub project: Project,
    pub assets: AssetLibrary,
    guard: ExportGuard,
    status: Option<Status>,
    last_receipt: Option<ExportReceipt>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            project: Project::new(&config.editor),
            assets: AssetLibrary::new(),
            guard: ExportGuard::new(),
            status: None,
            last_receipt: None,
        }
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn export_busy(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn last_receipt(&self) -> Option<&ExportReceipt> {
        self.last_receipt.as_ref()
    }

    fn report<E: std::fmt::Display>(&mut self, error: E) {
        let text = error.to_string();
        warn!(status = %text, "Action failed");
        self.status = Some(Status::error(text));
    }

    pub fn apply_browser(&mut self, action: MediaBrowserAction) -> Option<Effect> {
        match action {
            MediaBrowserAction::AddClip {
                asset_id,
                lane,
                track_index,
            } => {
                if let Err(e) = self
                    .project
                    .add_media_clip(lane, track_index, &asset_id, &self.assets)
                {
                    self.report(e);
                }
                None
            }
            MediaBrowserAction::AddCaption(request) => {
                if let Err(e) = self.project.add_caption(request) {
                    self.report(e);
                }
                None
            }
            MediaBrowserAction::Import => Some(Effect::PickUploads),
            MediaBrowserAction::Refresh => Some(Effect::RefreshAssets),
        }
    }

    pub fn apply_inspector(&mut self, action: InspectorAction) {
        let result = match action {
            InspectorAction::Update { clip_id, update } => {
                self.project.update_clip(&clip_id, update, &self.assets)
            }
            InspectorAction::Split { clip_id, offset } => self
                .project
                .split_clip(&clip_id, offset, &self.assets)
                .map(|tail| {
                    self.status = Some(Status::info(format!("Split into {clip_id} and {tail}")));
                }),
            InspectorAction::Remove(clip_id) => self.project.remove_clip(&clip_id).map(|_| ()),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    pub fn apply_timeline(&mut self, action: TimelineAction) -> Option<Effect> {
        match action {
            TimelineAction::NeedWaveform(asset_id) => {
                let extension = self.assets.get(&asset_id).and_then(|asset| {
                    Path::new(&asset.name)
                        .extension()
                        .map(|ext| ext.to_string_lossy().to_lowercase())
                });
                Some(Effect::FetchWaveform { asset_id, extension })
            }
            TimelineAction::TrackAdded(kind, index) => {
                self.status = Some(Status::info(format!("Added {kind} track #{}", index + 1)));
                None
            }
            TimelineAction::Selected(id) | TimelineAction::DragFinished(id) => {
                debug!(clip = %id, "Timeline selection");
                None
            }
            TimelineAction::SelectionCleared => None,
        }
    }

    /// Validate and claim the export slot. Nothing is claimed on failure.
    pub fn start_export(&mut self, settings: &ExportSettings) -> Option<Effect> {
        match prepare_export(&self.guard, &self.project, settings) {
            Ok((payload, ticket)) => {
                self.status = Some(Status::info("Exporting\u{2026}"));
                Some(Effect::Export(payload, ticket))
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    pub fn request_download(&self) -> Option<Effect> {
        self.last_receipt.as_ref().map(|r| Effect::PickDownload {
            export_id: r.export_id.clone(),
        })
    }

    pub fn handle_event(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Assets(Ok(assets)) => {
                info!(count = assets.len(), "Asset listing refreshed");
                self.assets.replace(assets);
            }
            BridgeEvent::Assets(Err(e)) => self.report(format!("Could not load assets: {e}")),
            BridgeEvent::Uploaded(outcomes) => {
                for outcome in &outcomes {
                    if let Ok(asset) = &outcome.result {
                        self.assets.upsert(asset.clone());
                    }
                }
                let summary = summarize_uploads(&outcomes);
                self.status = Some(if outcomes.iter().all(|o| o.is_ok()) {
                    Status::info(summary)
                } else {
                    Status::error(summary)
                });
            }
            BridgeEvent::WaveformResolved(asset_id) => debug!(asset = %asset_id, "Waveform ready"),
            BridgeEvent::Exported(Ok(receipt)) => {
                info!(export = %receipt.export_id, duration = receipt.duration, "Export finished");
                self.status = Some(Status::info(format!(
                    "Export ready ({:.2}s)",
                    receipt.duration
                )));
                self.last_receipt = Some(receipt);
            }
            BridgeEvent::Exported(Err(e)) => self.report(format!("Export failed: {e}")),
            BridgeEvent::Saved(Ok(path)) => {
                self.status = Some(Status::info(format!("Saved {}", path.display())));
            }
            BridgeEvent::Saved(Err(e)) => self.report(format!("Download failed: {e}")),
        }
    }
}
