//! Cutdeck Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types used throughout Cutdeck:
//! - Time representation and snap-to-grid quantization
//! - Seconds/pixel mapping and zoom bounds
//! - Editor configuration
//! - The shared error type

pub mod config;
pub mod error;
pub mod time;

pub use config::EditorConfig;
pub use error::{CutdeckError, Result};
pub use time::{
    coerce_number, finite_or, format_timecode, quantize, round_to, SnapGrid, TimeScale, ZoomRange,
};
