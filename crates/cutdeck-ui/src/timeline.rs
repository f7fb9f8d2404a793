//! Timeline panel with toolbar, track headers, ruler, grid, clips and drag handling.
//!
//! Painting always reads a [`TimelineLayout`] produced by the projector.
//! The layout is rebuilt only when the render scheduler has a pending
//! request, so a burst of mutations within one frame costs one projection.

use cutdeck_audio::{Waveform, WaveformCache, WaveformSample, WaveformState};
use cutdeck_core::format_timecode;
use cutdeck_timeline::{AssetLibrary, Clip, ClipId, Project, TrackKind};
use egui::{self, Color32, Pos2, Rect, Rounding, Stroke, Vec2};
use tracing::debug;

use crate::interaction::Interaction;
use crate::projector::{ClipBox, Projector, TimelineLayout};
use crate::scheduler::RenderScheduler;
use crate::theme::Theme;
use crate::widgets;

const TOOLBAR_HEIGHT: f32 = 28.0;
const RULER_HEIGHT: f32 = 20.0;
const TRACK_HEIGHT: f32 = 40.0;
const HEADER_WIDTH: f32 = 72.0;
const CLIP_INSET: f32 = 3.0;

/// Snap steps offered in the toolbar, seconds.
const SNAP_STEPS: &[f64] = &[0.1, 0.25, 0.5, 1.0];

// ── Actions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    Selected(ClipId),
    SelectionCleared,
    /// A drag ended; the model already holds its last frame.
    DragFinished(ClipId),
    /// An audio asset on the timeline has no waveform entry yet.
    NeedWaveform(String),
    TrackAdded(TrackKind, usize),
}

// ── View ───────────────────────────────────────────────────────

pub struct TimelineView {
    projector: Projector,
    interaction: Interaction,
    scheduler: RenderScheduler,
    layout: Option<TimelineLayout>,
    recomputes: u64,
}

impl TimelineView {
    pub fn new(projector: Projector, scheduler: RenderScheduler) -> Self {
        Self {
            projector,
            interaction: Interaction::new(),
            scheduler,
            layout: None,
            recomputes: 0,
        }
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Number of full projections so far.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Mark the model as changed.
    pub fn invalidate(&self) {
        self.scheduler.request();
    }

    /// Current layout, re-projected if a render was requested since the last call.
    pub fn layout(&mut self, project: &Project) -> &TimelineLayout {
        if self.scheduler.take() {
            self.layout = None;
        }
        let projector = self.projector;
        let recomputes = &mut self.recomputes;
        self.layout.get_or_insert_with(|| {
            *recomputes += 1;
            projector.layout(project)
        })
    }

    // ── Pointer handling ───────────────────────────────────────

    /// Pointer pressed at canvas `x` in lane `lane`.
    pub fn press(&mut self, project: &mut Project, lane: usize, x: f64) -> Option<TimelineAction> {
        let projector = self.projector;
        let hit = self
            .layout(project)
            .hit(&projector, lane, x)
            .map(|(clip, mode)| (clip.clip_id.clone(), mode));

        match hit {
            Some((clip_id, mode)) => {
                self.interaction.pointer_down(project, &clip_id, mode, x);
                self.invalidate();
                Some(TimelineAction::Selected(clip_id))
            }
            None if project.selection().is_some() => {
                project.clear_selection();
                self.invalidate();
                Some(TimelineAction::SelectionCleared)
            }
            None => None,
        }
    }

    /// Pointer moved to canvas `x`. Returns true when a clip changed.
    pub fn drag_to(
        &mut self,
        project: &mut Project,
        assets: &AssetLibrary,
        x: f64,
        fine: bool,
    ) -> bool {
        let changed = self.interaction.pointer_move(project, assets, x, fine);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Pointer released anywhere.
    pub fn release(&mut self) -> Option<TimelineAction> {
        let clip_id = self.interaction.pointer_up()?;
        self.invalidate();
        Some(TimelineAction::DragFinished(clip_id))
    }

    // ── Rendering ──────────────────────────────────────────────

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        project: &mut Project,
        assets: &AssetLibrary,
        waveforms: &WaveformCache,
    ) -> Vec<TimelineAction> {
        let mut actions = Vec::new();

        ui.vertical(|ui| {
            self.draw_toolbar(ui, project, &mut actions);

            let (width, lane_count) = {
                let layout = self.layout(project);
                (layout.width as f32, layout.lanes.len())
            };
            let body_height = RULER_HEIGHT + lane_count as f32 * TRACK_HEIGHT;

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::ZERO;

                let (header_resp, header_painter) =
                    ui.allocate_painter(Vec2::new(HEADER_WIDTH, body_height), egui::Sense::hover());
                draw_track_headers(&header_painter, header_resp.rect, self.layout(project));

                egui::ScrollArea::horizontal()
                    .id_salt("timeline_canvas")
                    .drag_to_scroll(false)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        let canvas_width = width.max(ui.available_width());
                        let (response, painter) = ui.allocate_painter(
                            Vec2::new(canvas_width, body_height),
                            egui::Sense::click_and_drag(),
                        );
                        let rect = response.rect;

                        self.handle_pointer(ui, &response, project, assets, &mut actions);

                        let projector = self.projector;
                        let layout = self.layout(project);
                        painter.rect_filled(rect, 0.0, Theme::bg());
                        let ruler_rect =
                            Rect::from_min_size(rect.min, Vec2::new(rect.width(), RULER_HEIGHT));
                        draw_ruler(&painter, ruler_rect, layout);
                        draw_lanes(&painter, rect, layout);
                        let hover = response.hover_pos();
                        actions.extend(draw_clips(
                            &painter,
                            rect,
                            layout,
                            &projector,
                            project,
                            waveforms,
                            hover,
                        ));

                        if project.clip_count() == 0 {
                            painter.text(
                                Pos2::new(
                                    rect.left() + 200.0,
                                    rect.top() + RULER_HEIGHT + TRACK_HEIGHT * 1.5,
                                ),
                                egui::Align2::CENTER_CENTER,
                                "Add media from the library to start editing",
                                egui::FontId::proportional(Theme::FONT_XS),
                                Theme::t4(),
                            );
                        }
                    });
            });
        });

        actions
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        project: &mut Project,
        assets: &AssetLibrary,
        actions: &mut Vec<TimelineAction>,
    ) {
        let rect = response.rect;
        let (pressed, released, down, latest, delta, fine) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.latest_pos(),
                i.pointer.delta(),
                i.modifiers.alt,
            )
        });
        let canvas_x = |pos: Pos2| f64::from(pos.x - rect.left());
        let lane_at = |pos: Pos2| {
            let y = pos.y - rect.top() - RULER_HEIGHT;
            (y >= 0.0).then(|| (y / TRACK_HEIGHT) as usize)
        };

        if pressed && response.hovered() {
            if let Some(pos) = latest {
                if let Some(lane) = lane_at(pos) {
                    actions.extend(self.press(project, lane, canvas_x(pos)));
                }
            }
        }

        if self.interaction.is_dragging() && delta != Vec2::ZERO {
            if let Some(pos) = latest {
                self.drag_to(project, assets, canvas_x(pos), fine);
            }
        }

        if self.interaction.is_dragging() && (released || !down) {
            actions.extend(self.release());
        }

        // Cursor
        if let Some(mode) = self.interaction.active_mode() {
            ui.ctx().set_cursor_icon(mode.cursor());
        } else if let Some(pos) = response.hover_pos() {
            let projector = self.projector;
            if let Some(lane) = lane_at(pos) {
                let mode = self
                    .layout(project)
                    .hit(&projector, lane, canvas_x(pos))
                    .map(|(_, mode)| mode);
                if let Some(mode) = mode {
                    ui.ctx().set_cursor_icon(mode.cursor());
                }
            }
        }
    }

    fn draw_toolbar(
        &mut self,
        ui: &mut egui::Ui,
        project: &mut Project,
        actions: &mut Vec<TimelineAction>,
    ) {
        let toolbar_frame = egui::Frame::none()
            .fill(Theme::bg1())
            .stroke(Stroke::new(Theme::STROKE_SUBTLE, Theme::white_06()))
            .inner_margin(egui::Margin::symmetric(Theme::SPACE_SM, 0.0));

        toolbar_frame.show(ui, |ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_SM, 0.0);

                // Snap
                let mut snap = project.snap();
                if widgets::toggle_switch(ui, &mut snap.enabled).changed() {
                    project.set_snap_enabled(snap.enabled);
                    self.invalidate();
                }
                let snap_label_color = if snap.enabled { Theme::t1() } else { Theme::t3() };
                ui.label(egui::RichText::new("Snap").size(Theme::FONT_XS).color(snap_label_color));

                let mut step = snap.step;
                egui::ComboBox::from_id_salt("snap_step")
                    .selected_text(format!("{step}s"))
                    .width(60.0)
                    .show_ui(ui, |ui| {
                        for s in SNAP_STEPS {
                            ui.selectable_value(&mut step, *s, format!("{s}s"));
                        }
                    });
                if step != snap.step && project.set_snap_step(step) {
                    self.invalidate();
                }

                ui.add_space(Theme::SPACE_SM);

                // Zoom
                let minus = egui::RichText::new("\u{2212}")
                    .size(Theme::FONT_SM)
                    .color(Theme::t3());
                if ui.small_button(minus).clicked()
                {
                    project.zoom_out();
                    self.invalidate();
                }
                ui.label(
                    egui::RichText::new(format!("{:.0} px/s", project.zoom()))
                        .size(Theme::FONT_XS)
                        .color(Theme::t3())
                        .family(egui::FontFamily::Monospace),
                );
                if ui
                    .small_button(egui::RichText::new("+").size(Theme::FONT_SM).color(Theme::t3()))
                    .clicked()
                {
                    project.zoom_in();
                    self.invalidate();
                }

                ui.add_space(Theme::SPACE_SM);

                for kind in TrackKind::ALL {
                    let label = match kind {
                        TrackKind::Video => "+ Video",
                        TrackKind::Audio => "+ Audio",
                        TrackKind::Text => "+ Text",
                    };
                    if ui.small_button(egui::RichText::new(label).size(Theme::FONT_XS)).clicked() {
                        let index = project.add_track(kind);
                        self.invalidate();
                        actions.push(TimelineAction::TrackAdded(kind, index));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format_timecode(project.content_end()))
                            .size(Theme::FONT_XS)
                            .color(Theme::t4())
                            .family(egui::FontFamily::Monospace),
                    );
                });
            });
        });
    }
}

// ── Waveform sampling ──────────────────────────────────────────

/// Amplitude for each pixel column of a clip, reading the asset waveform
/// from `in_point` onward. Columns past the end of the source are `None`.
pub fn waveform_columns(
    waveform: &Waveform,
    in_point: f64,
    px_per_sec: f64,
    width_px: usize,
) -> Vec<Option<WaveformSample>> {
    if !(px_per_sec > 0.0) {
        return Vec::new();
    }
    (0..width_px)
        .map(|px| waveform.sample_at(in_point + px as f64 / px_per_sec))
        .collect()
}

// ── Sub-components ─────────────────────────────────────────────

fn lane_top(rect: Rect, lane: usize) -> f32 {
    rect.top() + RULER_HEIGHT + lane as f32 * TRACK_HEIGHT
}

fn draw_track_headers(painter: &egui::Painter, rect: Rect, layout: &TimelineLayout) {
    painter.rect_filled(rect, 0.0, Theme::bg1());
    for (i, lane) in layout.lanes.iter().enumerate() {
        let top = lane_top(rect, i);
        let row = Rect::from_min_size(
            Pos2::new(rect.left(), top),
            Vec2::new(rect.width(), TRACK_HEIGHT),
        );
        painter.line_segment(
            [row.left_bottom(), row.right_bottom()],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()),
        );
        painter.text(
            Pos2::new(row.left() + Theme::SPACE_SM, row.center().y),
            egui::Align2::LEFT_CENTER,
            &lane.title,
            egui::FontId::proportional(Theme::FONT_XS),
            Theme::with_alpha(Theme::lane_color(lane.kind), 160),
        );
    }
}

fn draw_ruler(painter: &egui::Painter, rect: Rect, layout: &TimelineLayout) {
    painter.rect_filled(rect, 0.0, Theme::white_02());
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()),
    );

    for tick in &layout.ticks {
        let x = rect.left() + tick.x as f32;
        painter.line_segment(
            [Pos2::new(x, rect.bottom() - 8.0), Pos2::new(x, rect.bottom())],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_10()),
        );
        painter.text(
            Pos2::new(x + 2.0, rect.top() + 3.0),
            egui::Align2::LEFT_TOP,
            &tick.label,
            egui::FontId::monospace(Theme::FONT_XS),
            Theme::t4(),
        );
    }
}

fn draw_lanes(painter: &egui::Painter, rect: Rect, layout: &TimelineLayout) {
    let lanes_top = rect.top() + RULER_HEIGHT;
    let lanes_bottom = lane_top(rect, layout.lanes.len());

    for i in 0..layout.lanes.len() {
        let lane_rect = Rect::from_min_size(
            Pos2::new(rect.left(), lane_top(rect, i)),
            Vec2::new(rect.width(), TRACK_HEIGHT),
        );
        let lane_bg = if i % 2 == 0 { Theme::white_02() } else { Color32::TRANSPARENT };
        painter.rect_filled(lane_rect, 0.0, lane_bg);
        painter.line_segment(
            [lane_rect.left_bottom(), lane_rect.right_bottom()],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()),
        );
    }

    for x in &layout.grid_lines {
        let x = rect.left() + *x as f32;
        painter.line_segment(
            [Pos2::new(x, lanes_top), Pos2::new(x, lanes_bottom)],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()),
        );
    }
}

fn clip_rect(canvas: Rect, lane: usize, clip: &ClipBox) -> Rect {
    Rect::from_min_size(
        Pos2::new(canvas.left() + clip.left as f32, lane_top(canvas, lane) + CLIP_INSET),
        Vec2::new(clip.width as f32, TRACK_HEIGHT - 2.0 * CLIP_INSET),
    )
}

/// Paint every clip. Returns waveform requests for audio assets not yet in the cache.
fn draw_clips(
    painter: &egui::Painter,
    canvas: Rect,
    layout: &TimelineLayout,
    projector: &Projector,
    project: &Project,
    waveforms: &WaveformCache,
    hover: Option<Pos2>,
) -> Vec<TimelineAction> {
    let mut requests: Vec<TimelineAction> = Vec::new();

    for (lane_index, lane) in layout.lanes.iter().enumerate() {
        let color = Theme::lane_color(lane.kind);
        for clip in &lane.clips {
            let rect = clip_rect(canvas, lane_index, clip);
            let hovered = hover.is_some_and(|p| rect.contains(p));

            let (bg_alpha, border_alpha, border_width) = if clip.selected {
                (60, 160, 1.5)
            } else if hovered {
                (36, 80, 1.0)
            } else {
                (24, 40, Theme::STROKE_SUBTLE)
            };
            painter.rect_filled(
                rect,
                Rounding::same(Theme::RADIUS),
                Theme::with_alpha(color, bg_alpha),
            );

            if lane.kind == TrackKind::Audio {
                let request =
                    draw_waveform(painter, rect, clip, layout, project, waveforms, color);
                if let Some(request) = request {
                    if !requests.contains(&request) {
                        requests.push(request);
                    }
                }
            }

            draw_fades(painter, rect, clip);

            painter.rect_stroke(
                rect,
                Rounding::same(Theme::RADIUS),
                Stroke::new(border_width, Theme::with_alpha(color, border_alpha)),
            );

            let text_rect = rect.shrink2(Vec2::new(6.0, 0.0));
            if text_rect.width() > 12.0 {
                painter.with_clip_rect(text_rect).text(
                    Pos2::new(text_rect.left(), text_rect.center().y),
                    egui::Align2::LEFT_CENTER,
                    &clip.label,
                    egui::FontId::proportional(Theme::FONT_XS),
                    Theme::t1(),
                );
            }

            if clip.selected || hovered {
                draw_handles(painter, rect, projector.handle_width_px as f32, color);
            }
        }
    }

    if !requests.is_empty() {
        debug!(count = requests.len(), "Waveforms requested");
    }
    requests
}

fn draw_waveform(
    painter: &egui::Painter,
    rect: Rect,
    clip: &ClipBox,
    layout: &TimelineLayout,
    project: &Project,
    waveforms: &WaveformCache,
    color: Color32,
) -> Option<TimelineAction> {
    let asset_id = clip.asset_id.as_deref()?;
    let waveform = match waveforms.state(asset_id) {
        WaveformState::Absent => return Some(TimelineAction::NeedWaveform(asset_id.to_string())),
        WaveformState::Pending | WaveformState::Resolved(None) => return None,
        WaveformState::Resolved(Some(waveform)) => waveform,
    };
    let in_point = project
        .clip(&clip.clip_id)
        .and_then(Clip::as_media)
        .map_or(0.0, |m| m.in_point);

    let peak = waveform.peak();
    if peak <= 0.0 {
        return None;
    }
    let mid_y = rect.center().y;
    let half_h = rect.height() * 0.4;
    let stroke = Stroke::new(1.0, Theme::with_alpha(color, 110));
    let columns = waveform_columns(&waveform, in_point, layout.px_per_sec, rect.width() as usize);
    for (px, sample) in columns.into_iter().enumerate() {
        let Some(sample) = sample else { break };
        let x = rect.left() + px as f32;
        painter.line_segment(
            [
                Pos2::new(x, mid_y - sample.max / peak * half_h),
                Pos2::new(x, mid_y - sample.min / peak * half_h),
            ],
            stroke,
        );
    }
    None
}

fn draw_fades(painter: &egui::Painter, rect: Rect, clip: &ClipBox) {
    let shade = Theme::with_alpha(Color32::BLACK, 90);
    let fade_in = (clip.fade_in_px as f32).min(rect.width());
    if fade_in >= 1.0 {
        painter.add(egui::epaint::PathShape::convex_polygon(
            vec![
                rect.left_top(),
                Pos2::new(rect.left() + fade_in, rect.top()),
                rect.left_bottom(),
            ],
            shade,
            Stroke::NONE,
        ));
    }
    let fade_out = (clip.fade_out_px as f32).min(rect.width());
    if fade_out >= 1.0 {
        painter.add(egui::epaint::PathShape::convex_polygon(
            vec![
                Pos2::new(rect.right() - fade_out, rect.top()),
                rect.right_top(),
                rect.right_bottom(),
            ],
            shade,
            Stroke::NONE,
        ));
    }
}

fn draw_handles(painter: &egui::Painter, rect: Rect, width: f32, color: Color32) {
    let left = Rect::from_min_size(rect.min, Vec2::new(width, rect.height()));
    painter.rect_filled(
        left,
        Rounding {
            nw: Theme::RADIUS,
            sw: Theme::RADIUS,
            ne: 0.0,
            se: 0.0,
        },
        Theme::with_alpha(color, 90),
    );
    let right = Rect::from_min_size(
        Pos2::new(rect.right() - width, rect.top()),
        Vec2::new(width, rect.height()),
    );
    painter.rect_filled(
        right,
        Rounding {
            nw: 0.0,
            sw: 0.0,
            ne: Theme::RADIUS,
            se: Theme::RADIUS,
        },
        Theme::with_alpha(color, 90),
    );
}
