//! Time representation for timeline editing
//!
//! Timeline positions are plain `f64` seconds. Every interactive edit is
//! routed through [`SnapGrid::quantize`] before it is written to a clip,
//! and every pixel offset is derived through [`TimeScale`].

use serde::{Deserialize, Serialize};

/// Replace non-finite values with `fallback`.
#[inline]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Parse a user-entered number. Anything unparseable or non-finite is `0.0`.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(|v| finite_or(v, 0.0)).unwrap_or(0.0)
}

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Snap `value` to the nearest multiple of `step`.
///
/// Returns `value` unchanged when snapping is disabled, when `bypass` is
/// set, or when `step` is not a positive number. Non-finite input is `0.0`.
pub fn quantize(value: f64, step: f64, enabled: bool, bypass: bool) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if bypass || !enabled || !(step > 0.0) || !step.is_finite() {
        return value;
    }
    (value / step).round() * step
}

/// Snap-to-grid settings of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapGrid {
    /// Global snap toggle.
    pub enabled: bool,
    /// Grid step in seconds (always > 0).
    pub step: f64,
}

impl SnapGrid {
    pub const DEFAULT_STEP: f64 = 0.25;

    /// Create a grid. A non-positive step falls back to the default.
    pub fn new(enabled: bool, step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            Self::DEFAULT_STEP
        };
        Self { enabled, step }
    }

    /// Quantize a time value to this grid.
    ///
    /// `bypass` is the fine-positioning override held during a drag.
    #[inline]
    pub fn quantize(&self, value: f64, bypass: bool) -> f64 {
        quantize(value, self.step, self.enabled, bypass)
    }

    /// Change the step. Non-positive or non-finite input keeps the old step.
    pub fn set_step(&mut self, step: f64) -> bool {
        if step.is_finite() && step > 0.0 {
            self.step = step;
            true
        } else {
            false
        }
    }
}

impl Default for SnapGrid {
    fn default() -> Self {
        Self::new(true, Self::DEFAULT_STEP)
    }
}

/// Mapping between timeline seconds and canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    /// Pixels per second (the zoom factor).
    pub px_per_sec: f64,
}

impl TimeScale {
    #[inline]
    pub const fn new(px_per_sec: f64) -> Self {
        Self { px_per_sec }
    }

    /// Seconds → pixels, rounded to whole pixels.
    #[inline]
    pub fn to_px(self, seconds: f64) -> f64 {
        (seconds * self.px_per_sec).round()
    }

    /// Pixels → seconds (unrounded).
    #[inline]
    pub fn to_seconds(self, px: f64) -> f64 {
        if self.px_per_sec > 0.0 {
            px / self.px_per_sec
        } else {
            0.0
        }
    }
}

/// Inclusive zoom bounds in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    pub const DEFAULT: Self = Self {
        min: 40.0,
        max: 220.0,
    };

    /// Clamp a zoom value into range. Non-finite input yields `min`.
    pub fn clamp(self, px_per_sec: f64) -> f64 {
        finite_or(px_per_sec, self.min).clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Format seconds as `m:ss` for ruler labels.
pub fn format_timecode(seconds: f64) -> String {
    let total = finite_or(seconds, 0.0).max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
