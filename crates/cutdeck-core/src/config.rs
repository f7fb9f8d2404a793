//! Editor configuration shared by the timeline model and the UI.

use serde::{Deserialize, Serialize};

use crate::error::{CutdeckError, Result};
use crate::time::{SnapGrid, ZoomRange};

/// Tunables for a timeline editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial zoom in pixels per second.
    pub zoom: f64,
    /// Allowed zoom range.
    pub zoom_range: ZoomRange,
    /// Multiplier applied by zoom-in / zoom-out.
    pub zoom_step: f64,
    /// Initial snap toggle.
    pub snap_enabled: bool,
    /// Initial snap step in seconds.
    pub snap_step: f64,
    /// Minimum on-screen width of a clip box.
    pub min_clip_width_px: f64,
    /// Width of the trim handles at each clip edge.
    pub handle_width_px: f64,
}

impl EditorConfig {
    /// Check the values that would make the editor misbehave.
    pub fn validate(&self) -> Result<()> {
        if !(self.zoom_range.min > 0.0) || self.zoom_range.min > self.zoom_range.max {
            return Err(CutdeckError::Config(format!(
                "zoom range [{}, {}] is empty or non-positive",
                self.zoom_range.min, self.zoom_range.max
            )));
        }
        if !(self.zoom_step > 1.0) {
            return Err(CutdeckError::Config(format!(
                "zoom step {} must be greater than 1",
                self.zoom_step
            )));
        }
        if !(self.snap_step > 0.0) {
            return Err(CutdeckError::Config(format!(
                "snap step {} must be positive",
                self.snap_step
            )));
        }
        Ok(())
    }

    /// Snap grid built from the configured defaults.
    pub fn snap_grid(&self) -> SnapGrid {
        SnapGrid::new(self.snap_enabled, self.snap_step)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom: 90.0,
            zoom_range: ZoomRange::DEFAULT,
            zoom_step: 1.25,
            snap_enabled: true,
            snap_step: SnapGrid::DEFAULT_STEP,
            min_clip_width_px: 20.0,
            handle_width_px: 6.0,
        }
    }
}
