//! Left panel: asset library with search and filter chips, plus the caption form.

use cutdeck_core::{coerce_number, format_timecode};
use cutdeck_timeline::{Asset, AssetKind, AssetLibrary, CaptionRequest, Project, TrackKind};
use egui::{self, Rounding, Stroke, Vec2};

use crate::theme::Theme;

fn kind_icon(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Video => "\u{25B6}",
        AssetKind::Audio => "\u{266A}",
        AssetKind::Image => "\u{25FB}",
        AssetKind::Other => "\u{25C7}",
    }
}

fn kind_label(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Video => "video",
        AssetKind::Audio => "audio",
        AssetKind::Image => "image",
        AssetKind::Other => "file",
    }
}

const FILTERS: &[&str] = &["all", "video", "audio", "image"];

/// Whether `asset` passes the search box and the active filter chip.
pub fn matches_filter(asset: &Asset, query: &str, filter: &str) -> bool {
    let query = query.trim().to_ascii_lowercase();
    if !query.is_empty() && !asset.name.to_ascii_lowercase().contains(&query) {
        return false;
    }
    filter == "all" || kind_label(asset.kind) == filter
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else if b < KB * KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else {
        format!("{:.2} GB", b / (KB * KB * KB))
    }
}

// ── State ──────────────────────────────────────────────────────

pub struct MediaBrowserState {
    pub search_query: String,
    pub active_filter: usize,
    /// Track index that "+V" / "+A" append to.
    pub target_video: usize,
    pub target_audio: usize,
    pub caption_text: String,
    pub caption_start: String,
    pub caption_end: String,
    /// Uploads in flight; disables the import button.
    pub uploading: bool,
}

impl Default for MediaBrowserState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            active_filter: 0,
            target_video: 0,
            target_audio: 0,
            caption_text: String::new(),
            caption_start: "0".into(),
            caption_end: "2".into(),
            uploading: false,
        }
    }
}

impl MediaBrowserState {
    /// Caption request from the form inputs. Validation happens in the model.
    pub fn caption_request(&self) -> CaptionRequest {
        CaptionRequest::new(
            self.caption_text.trim(),
            coerce_number(&self.caption_start),
            coerce_number(&self.caption_end),
        )
    }
}

// ── Actions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum MediaBrowserAction {
    AddClip {
        asset_id: String,
        lane: TrackKind,
        track_index: usize,
    },
    AddCaption(CaptionRequest),
    Import,
    Refresh,
}

// ── Rendering ──────────────────────────────────────────────────

pub fn show_media_browser(
    ui: &mut egui::Ui,
    state: &mut MediaBrowserState,
    assets: &AssetLibrary,
    project: &Project,
) -> Vec<MediaBrowserAction> {
    let mut actions = Vec::new();
    ui.spacing_mut().item_spacing = Vec2::new(0.0, 6.0);

    // ── Search bar ─────────────────────────────────────────
    Theme::input_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);
            let resp = ui.add(
                egui::TextEdit::singleline(&mut state.search_query)
                    .hint_text("Search media\u{2026}")
                    .desired_width(ui.available_width() - 40.0)
                    .font(egui::FontId::proportional(Theme::FONT_XS))
                    .frame(false),
            );
            if !state.search_query.is_empty() && ui.small_button("\u{00D7}").clicked() {
                state.search_query.clear();
                resp.request_focus();
            }
            if ui.small_button("\u{21BB}").on_hover_text("Refresh").clicked() {
                actions.push(MediaBrowserAction::Refresh);
            }
        });
    });

    // ── Filter chips ───────────────────────────────────────
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_XS, Theme::SPACE_XS);
        for (i, filter) in FILTERS.iter().enumerate() {
            let is_active = state.active_filter == i;
            let (text_color, bg, border) = if is_active {
                (
                    Theme::accent(),
                    Theme::accent_subtle(),
                    Stroke::new(Theme::STROKE_SUBTLE, Theme::with_alpha(Theme::accent(), 60)),
                )
            } else {
                (
                    Theme::t3(),
                    Theme::input_bg(),
                    Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()),
                )
            };

            let chip = egui::Frame::none()
                .fill(bg)
                .stroke(border)
                .rounding(Rounding::same(Theme::RADIUS))
                .inner_margin(egui::Margin::symmetric(Theme::SPACE_SM, 2.0));

            let resp = chip
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(*filter)
                            .size(Theme::FONT_XS)
                            .color(text_color),
                    );
                })
                .response
                .interact(egui::Sense::click());
            if resp.clicked() {
                state.active_filter = i;
            }
        }
    });

    // ── Target tracks ──────────────────────────────────────
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_SM, 0.0);
        track_picker(ui, "target_video", TrackKind::Video, &mut state.target_video, project);
        track_picker(ui, "target_audio", TrackKind::Audio, &mut state.target_audio, project);
    });

    ui.add_space(2.0);

    let filter = FILTERS.get(state.active_filter).copied().unwrap_or("all");
    let list_height = (ui.available_height() - 150.0).max(80.0);

    egui::ScrollArea::vertical()
        .id_salt("asset_list")
        .max_height(list_height)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            if assets.is_empty() {
                ui.add_space(Theme::SPACE_MD);
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("+").size(28.0).color(Theme::white_10()));
                    ui.label(
                        egui::RichText::new("No media yet")
                            .size(Theme::FONT_XS)
                            .color(Theme::t4()),
                    );
                });
            }

            for asset in assets.iter().filter(|a| matches_filter(a, &state.search_query, filter)) {
                asset_row(ui, asset, state, &mut actions);
            }
        });

    ui.add_space(Theme::SPACE_SM);

    let import = egui::Button::new(
        egui::RichText::new(if state.uploading { "Uploading\u{2026}" } else { "+ Import Media" })
            .size(Theme::FONT_XS),
    )
    .min_size(Vec2::new(ui.available_width(), 28.0));
    if ui.add_enabled(!state.uploading, import).clicked() {
        actions.push(MediaBrowserAction::Import);
    }

    ui.add_space(Theme::SPACE_SM);
    Theme::draw_separator(ui);
    ui.add_space(Theme::SPACE_SM);

    // ── Caption form ───────────────────────────────────────
    Theme::section_label(ui, "CAPTION");
    ui.add(
        egui::TextEdit::singleline(&mut state.caption_text)
            .hint_text("Caption text")
            .desired_width(ui.available_width()),
    );
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_XS, 0.0);
        ui.label(egui::RichText::new("from").size(Theme::FONT_XS).color(Theme::t3()));
        ui.add(egui::TextEdit::singleline(&mut state.caption_start).desired_width(40.0));
        ui.label(egui::RichText::new("to").size(Theme::FONT_XS).color(Theme::t3()));
        ui.add(egui::TextEdit::singleline(&mut state.caption_end).desired_width(40.0));
        if ui.button("Add").clicked() {
            actions.push(MediaBrowserAction::AddCaption(state.caption_request()));
        }
    });

    actions
}

fn track_picker(
    ui: &mut egui::Ui,
    id: &str,
    lane: TrackKind,
    selected: &mut usize,
    project: &Project,
) {
    let count = project.tracks(lane).len();
    let name = if lane == TrackKind::Video { "Video" } else { "Audio" };
    if *selected >= count {
        *selected = 0;
    }
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("{name} {}", *selected + 1))
        .width(80.0)
        .show_ui(ui, |ui| {
            for i in 0..count {
                ui.selectable_value(selected, i, format!("{name} {}", i + 1));
            }
        });
}

fn asset_row(
    ui: &mut egui::Ui,
    asset: &Asset,
    state: &MediaBrowserState,
    actions: &mut Vec<MediaBrowserAction>,
) {
    let color = match asset.kind {
        AssetKind::Audio => Theme::green(),
        AssetKind::Image => Theme::purple(),
        _ => Theme::accent(),
    };
    let item_frame = egui::Frame::none()
        .rounding(Rounding::same(Theme::RADIUS))
        .inner_margin(egui::Margin::symmetric(Theme::SPACE_SM, 5.0));

    let resp = item_frame
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_SM, 0.0);

                let (thumb_resp, thumb_painter) =
                    ui.allocate_painter(Vec2::new(34.0, 22.0), egui::Sense::hover());
                let thumb_rect = thumb_resp.rect;
                thumb_painter.rect_filled(
                    thumb_rect,
                    Rounding::same(4.0),
                    Theme::with_alpha(color, 60),
                );
                thumb_painter.text(
                    thumb_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    kind_icon(asset.kind),
                    egui::FontId::proportional(Theme::FONT_XS),
                    Theme::with_alpha(color, 200),
                );

                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);
                    ui.label(
                        egui::RichText::new(asset.name.as_str())
                            .size(Theme::FONT_XS)
                            .color(Theme::t1()),
                    );
                    let duration = asset
                        .known_duration()
                        .map_or_else(|| "--:--".to_string(), format_timecode);
                    ui.label(
                        egui::RichText::new(format!(
                            "{duration} \u{00B7} {}",
                            format_size(asset.size_bytes)
                        ))
                        .size(Theme::FONT_XS)
                        .color(Theme::t4())
                        .family(egui::FontFamily::Monospace),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if asset.has_audio
                        && ui
                            .small_button("+A")
                            .on_hover_text("Add to audio track")
                            .clicked()
                    {
                        actions.push(MediaBrowserAction::AddClip {
                            asset_id: asset.id.clone(),
                            lane: TrackKind::Audio,
                            track_index: state.target_audio,
                        });
                    }
                    if asset.has_video
                        && ui
                            .small_button("+V")
                            .on_hover_text("Add to video track")
                            .clicked()
                    {
                        actions.push(MediaBrowserAction::AddClip {
                            asset_id: asset.id.clone(),
                            lane: TrackKind::Video,
                            track_index: state.target_video,
                        });
                    }
                });
            });
        })
        .response;

    if resp.hovered() {
        ui.painter()
            .rect_filled(resp.rect, Rounding::same(Theme::RADIUS), Theme::white_04());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, kind: AssetKind) -> Asset {
        Asset {
            id: name.into(),
            name: name.into(),
            kind,
            duration: 0.0,
            has_video: kind == AssetKind::Video,
            has_audio: kind == AssetKind::Audio,
            size_bytes: 0,
        }
    }

    #[test]
    fn test_filter_by_query_and_kind() {
        let clip = asset("Beach_Take2.MP4", AssetKind::Video);
        assert!(matches_filter(&clip, "", "all"));
        assert!(matches_filter(&clip, " beach ", "video"));
        assert!(!matches_filter(&clip, "beach", "audio"));
        assert!(!matches_filter(&clip, "city", "all"));
        assert!(matches_filter(&asset("notes.bin", AssetKind::Other), "", "all"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_caption_request_from_form() {
        let state = MediaBrowserState {
            caption_text: "  Hello  ".into(),
            caption_start: "1.5".into(),
            caption_end: "abc".into(),
            ..Default::default()
        };
        let req = state.caption_request();
        assert_eq!(req.text, "Hello");
        assert_eq!(req.start, 1.5);
        assert_eq!(req.end, 0.0);
        assert_eq!(req.font_size, 42);
    }
}
