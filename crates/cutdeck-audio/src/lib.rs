//! Cutdeck Audio - waveform data for the timeline
//!
//! - `decode`: Symphonia decoding of asset bytes held in memory
//! - `waveform`: mono downmix and min/max peak reduction
//! - `cache`: one decode per asset, failures remembered

pub mod cache;
pub mod decode;
pub mod error;
pub mod waveform;

pub use cache::{WaveformCache, WaveformState};
pub use decode::{decode_bytes, DecodedAudio};
pub use error::AudioError;
pub use waveform::{downmix, Waveform, WaveformSample, DEFAULT_BINS};

use tracing::warn;

/// Decode asset bytes and reduce them to [`DEFAULT_BINS`] peaks.
///
/// Decode failures are logged and reported as `None`, which the cache
/// stores as a permanent "no data" result.
pub fn waveform_from_bytes(
    asset_id: &str,
    bytes: Vec<u8>,
    extension: Option<&str>,
) -> Option<Waveform> {
    match decode_bytes(bytes, extension) {
        Ok(audio) => Some(Waveform::from_decoded(&audio, DEFAULT_BINS)),
        Err(e) => {
            warn!(asset = asset_id, error = %e, "Waveform decode failed");
            None
        }
    }
}
