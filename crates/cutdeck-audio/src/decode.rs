//! In-memory audio decoding via Symphonia.
//!
//! Asset bytes arrive from the backend as a single buffer; they are probed
//! and decoded in full into interleaved f32 samples.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::AudioError;

/// A fully decoded audio stream.
#[derive(Clone, Debug, Default)]
pub struct DecodedAudio {
    /// Interleaved f32 samples.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decode a complete audio (or audio-bearing video) file held in memory.
///
/// `extension` is an optional probe hint such as `"mp3"` or `"mp4"`.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<DecodedAudio, AudioError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioError::UnsupportedFormat(format!("{e}")))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.channels.is_some())
        .ok_or(AudioError::NoAudioTrack)?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::UnsupportedFormat(format!("Codec init failed: {e}")))?;

    let mut out = DecodedAudio {
        samples: Vec::new(),
        sample_rate: codec_params.sample_rate.unwrap_or(0),
        channels: codec_params.channels.map_or(0, |c| c.count() as u16),
    };

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(format!("{e}"))),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(error = %msg, "Skipping corrupted audio packet");
                continue;
            }
            Err(e) => return Err(AudioError::Decode(format!("{e}"))),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        out.sample_rate = spec.rate;
        out.channels = spec.channels.count() as u16;

        let mut buf = SampleBuffer::<f32>::new(frames as u64, spec);
        buf.copy_interleaved_ref(decoded);
        out.samples.extend_from_slice(buf.samples());
    }

    if out.samples.is_empty() {
        return Err(AudioError::Empty);
    }
    debug!(
        samples = out.samples.len(),
        sample_rate = out.sample_rate,
        channels = out.channels,
        "Decoded audio buffer"
    );
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 16-bit PCM WAV with the given interleaved samples.
    pub(crate) fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_decode_wav() {
        let samples: Vec<i16> = (0..8000)
            .map(|i| if i % 2 == 0 { 16384 } else { -16384 })
            .collect();
        let audio = decode_bytes(wav_bytes(&samples, 2, 8000), Some("wav")).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.frames(), 4000);
        assert!((audio.duration_seconds() - 0.5).abs() < 1e-9);
        assert!((audio.samples[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = decode_bytes(b"definitely not audio".to_vec(), None);
        assert!(matches!(result, Err(AudioError::UnsupportedFormat(_))));
    }
}
