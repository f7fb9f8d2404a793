//! Memoized waveform results keyed by asset id.
//!
//! At most one decode runs per asset: `begin` claims the slot with a
//! pending marker, `resolve` stores the outcome. Failures are stored as
//! `Resolved(None)` and never retried.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::waveform::Waveform;

/// State of one asset's waveform.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveformState {
    Absent,
    Pending,
    Resolved(Option<Arc<Waveform>>),
}

/// Shared waveform cache. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct WaveformCache {
    entries: Arc<Mutex<HashMap<String, WaveformState>>>,
}

impl WaveformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the decode for `asset_id`.
    ///
    /// Returns true only for the first caller; later callers see the
    /// pending or resolved entry and must not start another decode.
    pub fn begin(&self, asset_id: &str) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(asset_id) {
            return false;
        }
        entries.insert(asset_id.to_string(), WaveformState::Pending);
        debug!(asset = asset_id, "Waveform decode started");
        true
    }

    /// Store the outcome of a decode. `None` marks a permanent failure.
    pub fn resolve(&self, asset_id: &str, waveform: Option<Waveform>) {
        let ok = waveform.is_some();
        self.entries.lock().insert(
            asset_id.to_string(),
            WaveformState::Resolved(waveform.map(Arc::new)),
        );
        debug!(asset = asset_id, ok, "Waveform decode resolved");
    }

    pub fn state(&self, asset_id: &str) -> WaveformState {
        self.entries
            .lock()
            .get(asset_id)
            .cloned()
            .unwrap_or(WaveformState::Absent)
    }

    /// Decoded waveform, if one is available.
    pub fn get(&self, asset_id: &str) -> Option<Arc<Waveform>> {
        match self.entries.lock().get(asset_id) {
            Some(WaveformState::Resolved(Some(waveform))) => Some(Arc::clone(waveform)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
