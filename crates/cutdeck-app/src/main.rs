//! Cutdeck - non-linear timeline editor
//!
//! Entry point and main application loop.

mod bridge;
mod config;
mod session;

use anyhow::{Context as _, Result};
use cutdeck_media::{HttpBackend, InMemoryBackend};
use cutdeck_ui::{
    show_export_dialog, show_inspector, show_media_browser, ExportDialogAction, ExportDialogState,
    InspectorState, MediaBrowserState, Projector, RenderScheduler, Theme, TimelineView,
};
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bridge::{AppBackend, Bridge};
use crate::config::AppConfig;
use crate::session::{Effect, Session, StatusLevel};

const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "mkv", "webm", "avi", "wav", "mp3", "flac", "ogg", "m4a", "aac", "png", "jpg",
    "jpeg", "gif", "webp",
];

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let backend = if config.is_offline() {
        info!("No backend URL configured; running offline");
        AppBackend::Offline(InMemoryBackend::new())
    } else {
        info!(url = %config.backend_url, "Using render backend");
        AppBackend::Http(HttpBackend::new(config.backend_url.clone())?)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 560.0])
            .with_title("Cutdeck"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Cutdeck",
        options,
        Box::new(move |cc| Ok(Box::new(CutdeckApp::new(cc, config, backend)?))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

struct CutdeckApp {
    session: Session,
    bridge: Bridge,
    scheduler: RenderScheduler,
    timeline: TimelineView,
    browser: MediaBrowserState,
    inspector: InspectorState,
    export: ExportDialogState,
}

impl CutdeckApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        backend: AppBackend,
    ) -> std::io::Result<Self> {
        Theme::apply(&cc.egui_ctx);

        let ctx = cc.egui_ctx.clone();
        let scheduler = RenderScheduler::with_waker(move || ctx.request_repaint());
        let bridge = Bridge::new(backend, scheduler.clone())?;
        bridge.refresh_assets();

        Ok(Self {
            session: Session::new(&config),
            bridge,
            timeline: TimelineView::new(Projector::new(&config.editor), scheduler.clone()),
            scheduler,
            browser: MediaBrowserState::default(),
            inspector: InspectorState::default(),
            export: ExportDialogState::new(&config.export),
        })
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::RefreshAssets => self.bridge.refresh_assets(),
            Effect::PickUploads => {
                let picked = rfd::FileDialog::new()
                    .set_title("Import media")
                    .add_filter("Media", MEDIA_EXTENSIONS)
                    .pick_files();
                match picked {
                    Some(paths) if !paths.is_empty() => {
                        info!(files = paths.len(), "Uploading");
                        self.browser.uploading = true;
                        self.bridge.upload(paths);
                    }
                    _ => {}
                }
            }
            Effect::FetchWaveform {
                asset_id,
                extension,
            } => self.bridge.fetch_waveform(asset_id, extension),
            Effect::Export(payload, ticket) => self.bridge.export(payload, ticket),
            Effect::PickDownload { export_id } => {
                let target = rfd::FileDialog::new()
                    .set_title("Save export")
                    .set_file_name(format!("{export_id}.mp4"))
                    .add_filter("MP4 video", &["mp4"])
                    .save_file();
                if let Some(path) = target {
                    self.bridge.download(export_id, path);
                }
            }
        }
    }

    fn drain_events(&mut self) {
        for event in self.bridge.drain() {
            if matches!(event, bridge::BridgeEvent::Uploaded(_)) {
                self.browser.uploading = false;
            }
            self.session.handle_event(event);
        }
        self.export.last_receipt = self.session.last_receipt().cloned();
    }
}

impl eframe::App for CutdeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        let mut effects = Vec::new();
        let mut edited = false;

        // Top bar
        egui::TopBottomPanel::top("top_bar")
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Cutdeck")
                            .size(Theme::FONT_MD)
                            .strong()
                            .color(Theme::t1()),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Export\u{2026}").clicked() {
                            self.export.open = true;
                        }
                    });
                });
            });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Theme::status_bar_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(status) = self.session.status() {
                        let color = match status.level {
                            StatusLevel::Info => Theme::t2(),
                            StatusLevel::Error => Theme::red(),
                        };
                        ui.label(
                            egui::RichText::new(&status.text)
                                .size(Theme::FONT_SM)
                                .color(color),
                        );
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} clips \u{00B7} {} assets",
                                self.session.project.clip_count(),
                                self.session.assets.len()
                            ))
                            .size(Theme::FONT_XS)
                            .color(Theme::t4()),
                        );
                    });
                });
            });

        // Timeline at bottom
        egui::TopBottomPanel::bottom("timeline_panel")
            .resizable(true)
            .min_height(160.0)
            .default_height(260.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let actions = self.timeline.show(
                    ui,
                    &mut self.session.project,
                    &self.session.assets,
                    self.bridge.waveforms(),
                );
                for action in actions {
                    effects.extend(self.session.apply_timeline(action));
                }
            });

        // Media browser on left
        egui::SidePanel::left("media_panel")
            .resizable(true)
            .default_width(260.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let actions = show_media_browser(
                    ui,
                    &mut self.browser,
                    &self.session.assets,
                    &self.session.project,
                );
                for action in actions {
                    edited = true;
                    effects.extend(self.session.apply_browser(action));
                }
            });

        // Inspector on right
        egui::SidePanel::right("inspector_panel")
            .resizable(true)
            .default_width(260.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let actions = show_inspector(ui, &mut self.inspector, &self.session.project);
                for action in actions {
                    edited = true;
                    self.session.apply_inspector(action);
                }
            });

        // Project summary
        egui::CentralPanel::default()
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let project = &self.session.project;
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.label(
                        egui::RichText::new(cutdeck_core::format_timecode(project.content_end()))
                            .size(28.0)
                            .family(egui::FontFamily::Monospace)
                            .color(Theme::t1()),
                    );
                    let hint = if project.has_visual_content() {
                        "Ready to export"
                    } else {
                        "Add a video or caption clip to export"
                    };
                    ui.label(egui::RichText::new(hint).size(Theme::FONT_SM).color(Theme::t3()));
                });
            });

        let busy = self.session.export_busy();
        for action in show_export_dialog(ctx, &mut self.export, busy) {
            match action {
                ExportDialogAction::StartExport(settings) => {
                    effects.extend(self.session.start_export(&settings))
                }
                ExportDialogAction::Download { .. } => {
                    effects.extend(self.session.request_download())
                }
            }
        }

        // Panel edits land after the timeline painted this frame.
        if edited {
            self.scheduler.request();
        }
        for effect in effects {
            self.run(effect);
        }
    }
}
