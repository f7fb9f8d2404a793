//! Cutdeck Timeline - Timeline data model
//!
//! The editing core of the timeline:
//! - Assets, tracks and polymorphic clips
//! - The clip normalizer that keeps every clip valid
//! - Edit operations (add, update, remove, split)
//! - Export payload serialization for the render backend

pub mod asset;
pub mod clip;
pub mod edit;
pub mod error;
pub mod export;
pub mod normalize;
pub mod project;
pub mod track;

pub use asset::{Asset, AssetKind, AssetLibrary};
pub use clip::{Clip, ClipId, MediaClip, TextClip};
pub use edit::{CaptionRequest, ClipUpdate, MediaUpdate, TextUpdate, SPLIT_MARGIN};
pub use error::{EditError, EditResult};
pub use export::{build_export_payload, ExportPayload, ExportSettings};
pub use normalize::{normalize, normalize_media, normalize_text, MIN_MEDIA_DURATION, MIN_TEXT_SPAN};
pub use project::{ClipLocation, Project, Selection};
pub use track::{Track, TrackKind};
