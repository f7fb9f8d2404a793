//! Export dialog: output size, frame rate, background and the last render.

use crate::theme::Theme;
use cutdeck_core::coerce_number;
use cutdeck_media::ExportReceipt;
use cutdeck_timeline::ExportSettings;
use egui::{self, Vec2};

// ── State ───────────────────────────────────────────────────────

/// Persistent state for the export dialog.
pub struct ExportDialogState {
    /// Whether the dialog window is visible.
    pub open: bool,
    pub width: String,
    pub height: String,
    pub fps: String,
    pub bg_color: String,
    /// Most recent successful render.
    pub last_receipt: Option<ExportReceipt>,
}

impl ExportDialogState {
    pub fn new(defaults: &ExportSettings) -> Self {
        Self {
            open: false,
            width: defaults.width.to_string(),
            height: defaults.height.to_string(),
            fps: defaults.fps.to_string(),
            bg_color: defaults.bg_color.clone(),
            last_receipt: None,
        }
    }

    /// Settings from the form, clamped to the renderer's ranges.
    pub fn settings(&self) -> ExportSettings {
        let int = |raw: &str| coerce_number(raw).round().clamp(0.0, u32::MAX as f64) as u32;
        ExportSettings {
            width: int(&self.width),
            height: int(&self.height),
            fps: int(&self.fps),
            bg_color: self.bg_color.trim().to_string(),
        }
        .sanitized()
    }
}

impl Default for ExportDialogState {
    fn default() -> Self {
        Self::new(&ExportSettings::default())
    }
}

// ── Actions ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ExportDialogAction {
    /// User clicked "Export" with these settings.
    StartExport(ExportSettings),
    /// Save the rendered file of a finished export.
    Download { export_id: String },
}

// ── Rendering ───────────────────────────────────────────────────

/// Show the export dialog as a floating window.
///
/// `busy` disables the export button until the running request resolves.
pub fn show_export_dialog(
    ctx: &egui::Context,
    state: &mut ExportDialogState,
    busy: bool,
) -> Vec<ExportDialogAction> {
    let mut actions = Vec::new();

    if !state.open {
        return actions;
    }

    let mut still_open = state.open;

    egui::Window::new("Export")
        .open(&mut still_open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .frame(Theme::glass_frame())
        .show(ctx, |ui| {
            ui.set_width(300.0);
            ui.spacing_mut().item_spacing = Vec2::new(0.0, Theme::SPACE_SM);

            Theme::section_label(ui, "OUTPUT SIZE");
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_XS, 0.0);
                ui.add(egui::TextEdit::singleline(&mut state.width).desired_width(60.0));
                ui.label(egui::RichText::new("\u{00D7}").color(Theme::t3()));
                ui.add(egui::TextEdit::singleline(&mut state.height).desired_width(60.0));
            });

            Theme::section_label(ui, "FRAME RATE");
            ui.add(egui::TextEdit::singleline(&mut state.fps).desired_width(60.0));

            Theme::section_label(ui, "BACKGROUND");
            ui.add(
                egui::TextEdit::singleline(&mut state.bg_color)
                    .hint_text("black")
                    .desired_width(ui.available_width()),
            );

            let effective = state.settings();
            ui.label(
                egui::RichText::new(format!(
                    "{}\u{00D7}{} @ {} fps, {}",
                    effective.width, effective.height, effective.fps, effective.bg_color
                ))
                .size(Theme::FONT_XS)
                .color(Theme::t4())
                .family(egui::FontFamily::Monospace),
            );

            ui.add_space(Theme::SPACE_XS);
            Theme::draw_separator(ui);
            ui.add_space(Theme::SPACE_XS);

            if busy {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Rendering\u{2026}")
                            .size(Theme::FONT_SM)
                            .color(Theme::t1()),
                    );
                });
            } else if let Some(receipt) = &state.last_receipt {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Rendered {:.2}s", receipt.duration))
                            .size(Theme::FONT_SM)
                            .color(Theme::green()),
                    );
                    if ui.button("Save\u{2026}").clicked() {
                        actions.push(ExportDialogAction::Download {
                            export_id: receipt.export_id.clone(),
                        });
                    }
                });
            }

            let export_button =
                egui::Button::new("Export").min_size(Vec2::new(ui.available_width(), 28.0));
            if ui.add_enabled(!busy, export_button).clicked()
            {
                actions.push(ExportDialogAction::StartExport(effective));
            }
        });

    state.open = still_open;

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let state = ExportDialogState::default();
        assert_eq!(state.settings(), ExportSettings::default());
    }

    #[test]
    fn test_form_values_are_clamped() {
        let state = ExportDialogState {
            width: "100".into(),
            height: "-5".into(),
            fps: "120.4".into(),
            bg_color: "  ".into(),
            ..Default::default()
        };
        let settings = state.settings();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 240);
        assert_eq!(settings.fps, 60);
        assert_eq!(settings.bg_color, "black");
    }

    #[test]
    fn test_fractional_input_rounds() {
        let state = ExportDialogState {
            width: "1919.6".into(),
            fps: "29.97".into(),
            ..Default::default()
        };
        let settings = state.settings();
        assert_eq!(settings.width, 1920);
        assert_eq!(settings.fps, 30);
    }
}
