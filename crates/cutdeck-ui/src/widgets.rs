//! Shared widgets: toggle switch and labeled text field.

use crate::theme::Theme;
use egui::{self, Pos2, Rounding, Stroke, Vec2};

/// Pill-shaped on/off switch. Flips `on` when clicked.
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let (rect, mut response) = ui.allocate_exact_size(Vec2::new(28.0, 14.0), egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    let t = ui.ctx().animate_bool_with_time(response.id, *on, 0.12);
    let pill = Rounding::same(rect.height() / 2.0);
    let fill = if *on {
        Theme::with_alpha(Theme::accent(), 96)
    } else {
        Theme::white_04()
    };
    let painter = ui.painter();
    painter.rect_filled(rect, pill, fill);
    painter.rect_stroke(rect, pill, Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()));

    let r = rect.height() / 2.0 - 2.0;
    let x = egui::lerp((rect.left() + r + 2.0)..=(rect.right() - r - 2.0), t);
    let knob = if *on { Theme::accent() } else { Theme::white_25() };
    painter.circle_filled(Pos2::new(x, rect.center().y), r, knob);

    response
}

/// One `label: [value]` row.
///
/// Returns true when the user commits the edit (Enter or focus loss)
/// after changing the text.
pub fn labeled_field(ui: &mut egui::Ui, label: &str, value: &mut String, dirty: &mut bool) -> bool {
    let mut committed = false;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);
        ui.allocate_ui(Vec2::new(78.0, 22.0), |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(label)
                        .size(Theme::FONT_XS)
                        .color(Theme::t3()),
                );
            });
        });
        let resp = ui.add(
            egui::TextEdit::singleline(value)
                .desired_width(ui.available_width())
                .font(egui::TextStyle::Monospace),
        );
        if resp.changed() {
            *dirty = true;
        }
        if resp.lost_focus() && *dirty {
            *dirty = false;
            committed = true;
        }
    });
    committed
}
