//! Dark editor theme: palette, spacing and frame builders.

use cutdeck_timeline::TrackKind;
use egui::style::WidgetVisuals;
use egui::{Color32, Margin, Rounding, Stroke, Vec2};

/// Palette and metrics shared by every panel.
pub struct Theme;

impl Theme {
    pub const FONT_XS: f32 = 10.5;
    pub const FONT_SM: f32 = 12.5;
    pub const FONT_MD: f32 = 14.5;

    pub const SPACE_XS: f32 = 4.0;
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 14.0;

    pub const RADIUS: f32 = 4.0;
    pub const RADIUS_LG: f32 = 10.0;

    pub const STROKE_SUBTLE: f32 = 0.5;
    pub const STROKE_EMPHASIS: f32 = 1.5;
    pub const DIVIDER_WIDTH: f32 = 1.0;

    // ── Surfaces, darkest first ────────────────────────────────

    pub const fn bg() -> Color32 {
        Color32::from_rgb(14, 16, 19)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(22, 25, 29)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(30, 34, 39)
    }
    pub const fn bg3() -> Color32 {
        Color32::from_rgb(40, 45, 52)
    }
    pub const fn bg4() -> Color32 {
        Color32::from_rgb(52, 58, 66)
    }
    pub const fn input_bg() -> Color32 {
        Color32::from_rgb(17, 19, 23)
    }

    // ── Text, strongest first ──────────────────────────────────

    pub const fn t1() -> Color32 {
        Self::white(230)
    }
    pub const fn t2() -> Color32 {
        Self::white(160)
    }
    pub const fn t3() -> Color32 {
        Self::white(96)
    }
    pub const fn t4() -> Color32 {
        Self::white(48)
    }

    // ── Accent ─────────────────────────────────────────────────

    pub const fn accent() -> Color32 {
        Color32::from_rgb(74, 144, 226)
    }
    pub const fn accent_subtle() -> Color32 {
        Self::with_alpha(Self::accent(), 22)
    }
    pub const fn accent_hover() -> Color32 {
        Self::with_alpha(Self::accent(), 48)
    }

    // ── Translucent white overlays, named by percent ───────────

    pub const fn white_02() -> Color32 {
        Self::white(5)
    }
    pub const fn white_04() -> Color32 {
        Self::white(10)
    }
    pub const fn white_06() -> Color32 {
        Self::white(15)
    }
    pub const fn white_08() -> Color32 {
        Self::white(20)
    }
    pub const fn white_10() -> Color32 {
        Self::white(26)
    }
    pub const fn white_25() -> Color32 {
        Self::white(64)
    }
    pub const fn divider() -> Color32 {
        Self::white_06()
    }

    // ── Status and lanes ───────────────────────────────────────

    pub const fn red() -> Color32 {
        Color32::from_rgb(235, 87, 87)
    }
    pub const fn green() -> Color32 {
        Color32::from_rgb(82, 196, 140)
    }
    pub const fn amber() -> Color32 {
        Color32::from_rgb(240, 176, 64)
    }
    /// Fade ramps drawn over clips.
    pub const fn purple() -> Color32 {
        Color32::from_rgb(156, 132, 240)
    }

    /// Base color of clips on a lane.
    pub const fn lane_color(kind: TrackKind) -> Color32 {
        match kind {
            TrackKind::Video => Self::accent(),
            TrackKind::Audio => Self::green(),
            TrackKind::Text => Self::amber(),
        }
    }

    /// Premultiplied white at `alpha`.
    const fn white(alpha: u8) -> Color32 {
        Color32::from_rgba_premultiplied(alpha, alpha, alpha, alpha)
    }

    /// `c` with its alpha replaced, premultiplied.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        let a16 = a as u16;
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a16 / 255) as u8,
            (c.g() as u16 * a16 / 255) as u8,
            (c.b() as u16 * a16 / 255) as u8,
            a,
        )
    }

    // ── Frames ─────────────────────────────────────────────────

    pub fn panel_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg1())
            .inner_margin(Margin::same(Self::SPACE_SM))
    }

    pub fn input_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::input_bg())
            .stroke(Stroke::new(Self::STROKE_SUBTLE, Self::white_10()))
            .rounding(Rounding::same(Self::RADIUS))
            .inner_margin(Margin::symmetric(Self::SPACE_SM, Self::SPACE_XS))
    }

    /// Floating windows such as the export dialog.
    pub fn glass_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::with_alpha(Self::bg2(), 236))
            .stroke(Stroke::new(Self::STROKE_SUBTLE, Self::white_08()))
            .rounding(Rounding::same(Self::RADIUS_LG))
            .inner_margin(Margin::same(Self::SPACE_MD))
            .shadow(egui::epaint::Shadow {
                offset: Vec2::new(0.0, 6.0),
                blur: 24.0,
                spread: 0.0,
                color: Color32::from_black_alpha(110),
            })
    }

    pub fn status_bar_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(Self::bg())
            .stroke(Stroke::new(Self::STROKE_SUBTLE, Self::white_06()))
            .inner_margin(Margin::symmetric(Self::SPACE_MD, Self::SPACE_XS))
    }

    // ── Small painters ─────────────────────────────────────────

    pub fn draw_separator(ui: &mut egui::Ui) {
        let size = Vec2::new(ui.available_width(), Self::DIVIDER_WIDTH);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, Self::divider());
    }

    /// Small caps-style caption above a group of fields.
    pub fn section_label(ui: &mut egui::Ui, text: &str) {
        ui.label(
            egui::RichText::new(text)
                .size(Self::FONT_XS)
                .color(Self::t3())
                .strong(),
        );
    }

    /// Install the palette into `ctx`.
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::input_bg();
        visuals.faint_bg_color = Self::bg2();

        let outline = Stroke::new(Self::STROKE_SUBTLE, Self::white_04());
        paint_widget(&mut visuals.widgets.noninteractive, Self::bg2(), Self::t3(), outline);
        paint_widget(&mut visuals.widgets.inactive, Self::bg3(), Self::t2(), outline);
        paint_widget(
            &mut visuals.widgets.hovered,
            Self::bg4(),
            Self::t1(),
            Stroke::new(Self::STROKE_SUBTLE, Self::accent_hover()),
        );
        paint_widget(
            &mut visuals.widgets.active,
            Self::accent_subtle(),
            Self::accent(),
            Stroke::new(Self::STROKE_EMPHASIS, Self::accent()),
        );

        visuals.selection.bg_fill = Self::accent_hover();
        visuals.selection.stroke = Stroke::new(1.0, Self::accent());
        visuals.window_rounding = Rounding::same(Self::RADIUS_LG);
        visuals.window_stroke = outline;

        style.visuals = visuals;
        style.interaction.tooltip_delay = 0.3;
        ctx.set_style(style);
    }
}

fn paint_widget(widget: &mut WidgetVisuals, fill: Color32, text: Color32, outline: Stroke) {
    widget.bg_fill = fill;
    widget.weak_bg_fill = fill;
    widget.fg_stroke = Stroke::new(1.0, text);
    widget.bg_stroke = outline;
    widget.rounding = Rounding::same(Theme::RADIUS);
}
