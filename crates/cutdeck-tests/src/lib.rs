//! Integration test crate for Cutdeck.
//!
//! Cross-crate scenarios: editing through the pointer state machine,
//! export validation and transport, and the waveform pipeline.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod export;

#[cfg(test)]
mod waveform;

/// 16-bit mono PCM WAV of a repeating ramp.
#[cfg(test)]
pub(crate) fn ramp_wav(frames: usize, sample_rate: u32) -> Vec<u8> {
    let data_len = (frames * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..frames {
        let s = ((i % 200) as i16 - 100) * 250;
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}
