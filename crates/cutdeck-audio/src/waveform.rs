//! Waveform peaks for clip painting.
//!
//! Interleaved samples are downmixed to mono and reduced to a fixed number
//! of min/max bins, independent of clip width or zoom.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedAudio;

/// Bins computed per asset.
pub const DEFAULT_BINS: usize = 1000;

/// Amplitude range of one bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    pub min: f32,
    pub max: f32,
}

/// Reduced waveform of a whole asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    pub data: Vec<WaveformSample>,
    /// Length of the decoded source in seconds.
    pub duration: f64,
}

/// Average interleaved frames into a mono signal.
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

impl Waveform {
    /// Reduce mono samples to `bins` min/max pairs, or one per sample when
    /// there are fewer samples than bins.
    pub fn compute(samples: &[f32], bins: usize, duration: f64) -> Self {
        if bins == 0 || samples.is_empty() {
            return Self {
                data: Vec::new(),
                duration,
            };
        }

        let len = samples.len();
        let bins = bins.min(len);
        let data = (0..bins)
            .map(|i| {
                samples[i * len / bins..(i + 1) * len / bins].iter().fold(
                    WaveformSample {
                        min: f32::MAX,
                        max: f32::MIN,
                    },
                    |acc, &s| WaveformSample {
                        min: acc.min.min(s),
                        max: acc.max.max(s),
                    },
                )
            })
            .collect();

        Self { data, duration }
    }

    /// Downmix and reduce a decoded stream.
    pub fn from_decoded(audio: &DecodedAudio, bins: usize) -> Self {
        let mono = downmix(&audio.samples, audio.channels);
        Self::compute(&mono, bins, audio.duration_seconds())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Largest absolute amplitude, used to scale the painted shape.
    pub fn peak(&self) -> f32 {
        self.data
            .iter()
            .map(|s| s.max.abs().max(s.min.abs()))
            .fold(0.0, f32::max)
    }

    /// Bin covering source time `seconds`.
    pub fn sample_at(&self, seconds: f64) -> Option<WaveformSample> {
        if self.data.is_empty() || !(self.duration > 0.0) || !(seconds >= 0.0) {
            return None;
        }
        let fraction = seconds / self.duration;
        if fraction >= 1.0 {
            return None;
        }
        let index = (fraction * self.data.len() as f64) as usize;
        self.data.get(index).copied()
    }
}
