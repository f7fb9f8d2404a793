//! Asset records and the editor's cached view of the asset library.
//!
//! The library itself lives on the remote backend; the editor only keeps
//! the last listing so it can look up durations and stream flags.

use serde::{Deserialize, Serialize};

use crate::track::TrackKind;

/// Broad media category reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Audio,
    Image,
    #[serde(other)]
    Other,
}

/// Immutable reference to an uploaded media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "asset_id")]
    pub id: String,
    #[serde(rename = "original_name", default)]
    pub name: String,
    pub kind: AssetKind,
    /// Seconds; zero or negative means unknown / still.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub size_bytes: u64,
}

impl Asset {
    /// Duration if the backend reported one.
    pub fn known_duration(&self) -> Option<f64> {
        (self.duration.is_finite() && self.duration > 0.0).then_some(self.duration)
    }

    /// Whether the asset carries the stream a track of `kind` needs.
    pub fn supports(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Video => self.has_video,
            TrackKind::Audio => self.has_audio,
            TrackKind::Text => false,
        }
    }
}

/// Last-known asset listing.
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    assets: Vec<Asset>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached listing.
    pub fn replace(&mut self, assets: Vec<Asset>) {
        self.assets = assets;
    }

    /// Insert or update a single asset (e.g. after an upload).
    pub fn upsert(&mut self, asset: Asset) {
        if let Some(existing) = self.assets.iter_mut().find(|a| a.id == asset.id) {
            *existing = asset;
        } else {
            self.assets.push(asset);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Known duration of an asset, `None` if missing or unknown.
    pub fn duration_of(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(Asset::known_duration)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<Asset> for AssetLibrary {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().collect(),
        }
    }
}
