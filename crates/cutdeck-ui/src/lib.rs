//! Cutdeck UI - timeline interaction, projection and egui panels
//!
//! - `projector`: pure timeline → layout projection and hit testing
//! - `interaction`: move / trim drag state machine
//! - `scheduler`: coalesced render requests
//! - `timeline`, `inspector`, `media_browser`, `export_dialog`: egui panels

pub mod export_dialog;
pub mod inspector;
pub mod interaction;
pub mod media_browser;
pub mod projector;
pub mod scheduler;
pub mod theme;
pub mod timeline;
pub mod widgets;

pub use export_dialog::{show_export_dialog, ExportDialogAction, ExportDialogState};
pub use inspector::{show_inspector, InspectorAction, InspectorState};
pub use interaction::{apply_drag, Drag, DragMode, DragOrigin, Interaction, InteractionState};
pub use media_browser::{show_media_browser, MediaBrowserAction, MediaBrowserState};
pub use projector::{ClipBox, LaneLayout, Projector, RulerTick, TimelineLayout};
pub use scheduler::RenderScheduler;
pub use theme::Theme;
pub use timeline::{TimelineAction, TimelineView};
