//! Right-side inspector: per-field editing, split and delete for the selected clip.
//!
//! Fields are edited as text drafts and committed on Enter or focus loss.
//! A committed draft becomes a [`ClipUpdate`] via [`ClipUpdate::parse`];
//! the caller applies it, which normalizes the clip.

use cutdeck_core::coerce_number;
use cutdeck_timeline::{Clip, ClipId, ClipUpdate, Project, TrackKind};
use egui::{self, Color32, Rounding, Stroke, Vec2};

use crate::theme::Theme;
use crate::widgets;

// ── Field table ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Timing,
    Look,
}

#[derive(Debug, Clone, PartialEq)]
struct FieldDraft {
    field: &'static str,
    label: &'static str,
    section: Section,
    value: String,
    dirty: bool,
}

fn seconds(v: f64) -> String {
    format!("{v:.2}")
}

/// Field name, label, section and current display value for a clip.
fn clip_fields(clip: &Clip) -> Vec<(&'static str, &'static str, Section, String)> {
    match clip {
        Clip::Media(m) => vec![
            ("start", "Start", Section::Timing, seconds(m.start)),
            ("in_point", "In point", Section::Timing, seconds(m.in_point)),
            ("duration", "Duration", Section::Timing, seconds(m.duration)),
            ("transition_in", "Fade in", Section::Look, seconds(m.transition_in)),
            ("transition_out", "Fade out", Section::Look, seconds(m.transition_out)),
            ("volume", "Volume", Section::Look, seconds(m.volume)),
        ],
        Clip::Text(t) => vec![
            ("text", "Text", Section::Timing, t.text.clone()),
            ("start", "Start", Section::Timing, seconds(t.start)),
            ("end", "End", Section::Timing, seconds(t.end)),
            ("font_size", "Font size", Section::Look, t.font_size.to_string()),
            ("color", "Color", Section::Look, t.color.clone()),
            ("x", "X", Section::Look, format!("{:.0}", t.x)),
            ("y", "Y", Section::Look, format!("{:.0}", t.y)),
        ],
    }
}

// ── State ──────────────────────────────────────────────────────

pub struct InspectorState {
    clip_id: Option<ClipId>,
    drafts: Vec<FieldDraft>,
    /// Split offset input, seconds from the clip start.
    pub split_offset: String,
    pub timing_open: bool,
    pub look_open: bool,
}

impl Default for InspectorState {
    fn default() -> Self {
        Self {
            clip_id: None,
            drafts: Vec::new(),
            split_offset: String::new(),
            timing_open: true,
            look_open: true,
        }
    }
}

impl InspectorState {
    /// Bring drafts in line with the selected clip.
    ///
    /// A new selection resets every draft. For the same clip only drafts
    /// the user is not editing are refreshed, so drags show up live.
    pub fn sync(&mut self, clip: Option<&Clip>) {
        let Some(clip) = clip else {
            self.clip_id = None;
            self.drafts.clear();
            return;
        };
        let fields = clip_fields(clip);
        if self.clip_id.as_ref() != Some(clip.id()) {
            self.clip_id = Some(clip.id().clone());
            self.split_offset = seconds(clip.duration() / 2.0);
            self.drafts = fields
                .into_iter()
                .map(|(field, label, section, value)| FieldDraft {
                    field,
                    label,
                    section,
                    value,
                    dirty: false,
                })
                .collect();
            return;
        }
        for (draft, (_, _, _, value)) in self.drafts.iter_mut().zip(fields) {
            if !draft.dirty {
                draft.value = value;
            }
        }
    }

    /// Current draft text of `field`.
    pub fn draft(&self, field: &str) -> Option<&str> {
        self.drafts
            .iter()
            .find(|d| d.field == field)
            .map(|d| d.value.as_str())
    }
}

// ── Actions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum InspectorAction {
    Update { clip_id: ClipId, update: ClipUpdate },
    Split { clip_id: ClipId, offset: f64 },
    Remove(ClipId),
}

// ── Rendering ──────────────────────────────────────────────────

pub fn show_inspector(
    ui: &mut egui::Ui,
    state: &mut InspectorState,
    project: &Project,
) -> Vec<InspectorAction> {
    let mut actions = Vec::new();
    let selected = project.selected_clip();
    state.sync(selected);

    let (Some(clip), Some(lane)) = (selected, project.selection().map(|s| s.lane)) else {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.label(
                egui::RichText::new("\u{25C7}")
                    .size(28.0)
                    .color(Theme::white_10()),
            );
            ui.add_space(Theme::SPACE_SM);
            ui.label(
                egui::RichText::new("Select a clip to inspect")
                    .size(Theme::FONT_XS)
                    .color(Theme::t4()),
            );
        });
        return actions;
    };
    let clip_id = clip.id().clone();

    ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);

    // ── Header ─────────────────────────────────────────────
    let header_frame = egui::Frame::none()
        .stroke(Stroke::new(0.5, Theme::with_alpha(Color32::WHITE, 8)))
        .inner_margin(egui::Margin::symmetric(12.0, 9.0));

    header_frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 0.0);
            let (dot_resp, dot_painter) =
                ui.allocate_painter(Vec2::splat(10.0), egui::Sense::hover());
            dot_painter.rect_filled(dot_resp.rect, Rounding::same(3.0), Theme::lane_color(lane));

            ui.label(
                egui::RichText::new(clip.label())
                    .size(12.0)
                    .color(Theme::t1())
                    .strong(),
            );
            ui.label(
                egui::RichText::new(format!("{lane} \u{00B7} {}", clip.id()))
                    .size(Theme::FONT_XS)
                    .color(Theme::t4())
                    .family(egui::FontFamily::Monospace),
            );
        });
    });

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let commit = |draft: &FieldDraft, actions: &mut Vec<InspectorAction>| {
                if let Some(update) = ClipUpdate::parse(lane, draft.field, &draft.value) {
                    actions.push(InspectorAction::Update {
                        clip_id: clip_id.clone(),
                        update,
                    });
                }
            };

            let timing_title = if lane == TrackKind::Text { "Caption" } else { "Timing" };
            collapsible_section(ui, timing_title, &mut state.timing_open, |ui| {
                for draft in state.drafts.iter_mut().filter(|d| d.section == Section::Timing) {
                    if widgets::labeled_field(ui, draft.label, &mut draft.value, &mut draft.dirty) {
                        commit(draft, &mut actions);
                    }
                }
            });

            let look_title = if lane == TrackKind::Text { "Style" } else { "Fades & Volume" };
            collapsible_section(ui, look_title, &mut state.look_open, |ui| {
                for draft in state.drafts.iter_mut().filter(|d| d.section == Section::Look) {
                    if widgets::labeled_field(ui, draft.label, &mut draft.value, &mut draft.dirty) {
                        commit(draft, &mut actions);
                    }
                }
            });

            ui.add_space(Theme::SPACE_SM);
            Theme::draw_separator(ui);
            ui.add_space(Theme::SPACE_SM);

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_SM, 0.0);
                if lane.is_media() {
                    ui.add(
                        egui::TextEdit::singleline(&mut state.split_offset)
                            .desired_width(56.0)
                            .font(egui::TextStyle::Monospace),
                    );
                    if ui.button("Split").clicked() {
                        actions.push(InspectorAction::Split {
                            clip_id: clip_id.clone(),
                            offset: coerce_number(&state.split_offset),
                        });
                    }
                }
                let delete = egui::Button::new(
                    egui::RichText::new("Delete")
                        .size(Theme::FONT_XS)
                        .color(Theme::red()),
                );
                if ui.add(delete).clicked() {
                    actions.push(InspectorAction::Remove(clip_id.clone()));
                }
            });
        });

    actions
}

// ── Helpers ────────────────────────────────────────────────────

fn collapsible_section(
    ui: &mut egui::Ui,
    title: &str,
    open: &mut bool,
    content: impl FnOnce(&mut egui::Ui),
) {
    let chevron = if *open { "\u{25BE}" } else { "\u{25B8}" };

    ui.add_space(4.0);
    let sep_rect = ui.allocate_space(Vec2::new(ui.available_width(), 0.5));
    ui.painter().rect_filled(
        egui::Rect::from_min_size(sep_rect.1.min, Vec2::new(sep_rect.1.width(), 0.5)),
        0.0,
        Theme::with_alpha(Color32::WHITE, 8),
    );

    let header_resp = ui
        .horizontal(|ui| {
            ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);
            ui.add_space(4.0);
            ui.label(egui::RichText::new(chevron).size(8.0).color(Theme::t4()));
            ui.label(
                egui::RichText::new(title)
                    .size(9.5)
                    .color(Theme::t3())
                    .strong(),
            );
        })
        .response
        .interact(egui::Sense::click());

    if header_resp.clicked() {
        *open = !*open;
    }

    if *open {
        ui.indent(title, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(0.0, 4.0);
            content(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutdeck_timeline::{Asset, AssetKind, AssetLibrary, CaptionRequest, MediaUpdate};

    fn project_with_clip() -> (Project, AssetLibrary, ClipId) {
        let assets: AssetLibrary = [Asset {
            id: "a".into(),
            name: "a.mp4".into(),
            kind: AssetKind::Video,
            duration: 10.0,
            has_video: true,
            has_audio: true,
            size_bytes: 0,
        }]
        .into_iter()
        .collect();
        let mut project = Project::default();
        let id = project.add_media_clip(TrackKind::Video, 0, "a", &assets).unwrap();
        (project, assets, id)
    }

    #[test]
    fn test_sync_resets_on_new_selection() {
        let (project, _, _) = project_with_clip();
        let mut state = InspectorState::default();
        state.sync(project.selected_clip());
        assert_eq!(state.draft("duration"), Some("8.00"));
        assert_eq!(state.draft("volume"), Some("1.00"));
        assert_eq!(state.split_offset, "4.00");
        assert_eq!(state.draft("text"), None);

        state.sync(None);
        assert_eq!(state.draft("duration"), None);
    }

    #[test]
    fn test_sync_keeps_dirty_drafts() {
        let (mut project, assets, id) = project_with_clip();
        let mut state = InspectorState::default();
        state.sync(project.selected_clip());

        for draft in &mut state.drafts {
            if draft.field == "start" {
                draft.value = "2.5".into();
                draft.dirty = true;
            }
        }
        project
            .update_clip(&id, ClipUpdate::Media(MediaUpdate::Duration(3.0)), &assets)
            .unwrap();
        state.sync(project.selected_clip());

        assert_eq!(state.draft("start"), Some("2.5"));
        assert_eq!(state.draft("duration"), Some("3.00"));
    }

    #[test]
    fn test_caption_fields() {
        let mut project = Project::default();
        project
            .add_caption(CaptionRequest::new("Hello", 1.0, 2.0))
            .unwrap();
        let fields = clip_fields(project.selected_clip().unwrap());
        let names: Vec<_> = fields.iter().map(|f| f.0).collect();
        assert_eq!(names, ["text", "start", "end", "font_size", "color", "x", "y"]);
        assert_eq!(fields[3].3, "42");
        assert_eq!(fields[6].3, "640");
    }

    #[test]
    fn test_every_field_parses_for_its_lane() {
        let (project, _, _) = project_with_clip();
        for (field, _, _, value) in clip_fields(project.selected_clip().unwrap()) {
            assert!(ClipUpdate::parse(TrackKind::Video, field, &value).is_some(), "{field}");
        }
    }
}
