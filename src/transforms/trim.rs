//! Trim
//!
//! Removes leading and trailing silence. Loudness is measured on centred
//! RMS frames of the mono mix, relative to the loudest frame.

use serde_json::{json, Value};
use tracing::debug;

use super::{validate_probability, RandomSources, Transform};
use crate::engine::AudioBuffer;
use crate::error::{DocsError, Result};
use crate::impl_transform_common;

const FRAME_LENGTH: usize = 2048;
const HOP_LENGTH: usize = 512;

/// Power floor before conversion to dB
const POWER_FLOOR: f32 = 1e-10;

/// Leading and trailing silence removal
#[derive(Debug, Clone)]
pub struct Trim {
    top_db: f32,
    p: f32,
}

impl Default for Trim {
    fn default() -> Self {
        Self { top_db: 30.0, p: 0.5 }
    }
}

impl Trim {
    /// Frames quieter than `top_db` below the loudest frame count as silence
    pub fn new(top_db: f32, p: f32) -> Result<Self> {
        validate_probability(p)?;
        if !(top_db.is_finite() && top_db > 0.0) {
            return Err(DocsError::InvalidParameter {
                param: "top_db".to_string(),
                value: top_db.to_string(),
                expected: "positive dB value".to_string(),
            });
        }
        Ok(Self { top_db, p })
    }
}

/// Mean square of each centred frame
fn frame_power(samples: &[f32]) -> Vec<f32> {
    let pad = FRAME_LENGTH / 2;
    let mut padded = vec![0.0_f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let num_frames = 1 + (padded.len() - FRAME_LENGTH) / HOP_LENGTH;
    (0..num_frames)
        .map(|frame| {
            let start = frame * HOP_LENGTH;
            let window = &padded[start..start + FRAME_LENGTH];
            window.iter().map(|s| s * s).sum::<f32>() / FRAME_LENGTH as f32
        })
        .collect()
}

/// Sample range `[start, end)` spanned by non-silent frames
fn non_silent_span(samples: &[f32], top_db: f32) -> (usize, usize) {
    let power = frame_power(samples);
    let to_db = |p: f32| 10.0 * p.max(POWER_FLOOR).log10();
    let reference = to_db(power.iter().copied().fold(0.0, f32::max));

    let loud: Vec<usize> = power
        .iter()
        .enumerate()
        .filter(|(_, &p)| to_db(p) - reference > -top_db)
        .map(|(i, _)| i)
        .collect();

    match (loud.first(), loud.last()) {
        (Some(&first), Some(&last)) => (
            (first * HOP_LENGTH).min(samples.len()),
            ((last + 1) * HOP_LENGTH).min(samples.len()),
        ),
        _ => (0, 0),
    }
}

impl Transform for Trim {
    impl_transform_common!("Trim");

    fn params(&self) -> Value {
        json!({
            "top_db": self.top_db,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, _rng: &mut RandomSources) -> Result<AudioBuffer> {
        let (start, end) = non_silent_span(&input.to_mono(), self.top_db);
        debug!(start, end, total = input.num_samples(), "trim span");
        input.map_channels(|ch| Ok(ch[start..end].to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::tone;

    fn padded_tone() -> AudioBuffer {
        let mut samples = vec![0.0; 8000];
        samples.extend_from_slice(tone().channel(0));
        samples.extend(std::iter::repeat(0.0).take(8000));
        AudioBuffer::from_mono(samples, 16000)
    }

    #[test]
    fn test_removes_surrounding_silence() {
        let input = padded_tone();
        let mut trim = Trim::new(30.0, 1.0).unwrap();
        let out = trim.apply(&input, &mut RandomSources::seeded(345)).unwrap();

        assert!(out.num_samples() < input.num_samples());
        assert!(out.num_samples() >= 16000);
        assert_eq!(out.sample_rate(), 16000);
    }

    #[test]
    fn test_loud_signal_is_kept_whole() {
        let input = tone();
        let mut trim = Trim::default();
        let out = trim.transform(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_silence_is_returned_unchanged() {
        let input = AudioBuffer::new(1, 5000, 16000);
        let mut trim = Trim::new(30.0, 1.0).unwrap();
        let out = trim.transform(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_rejects_non_positive_top_db() {
        assert!(Trim::new(0.0, 1.0).is_err());
    }
}
