//! TimeStretch
//!
//! Changes playback speed without changing pitch, using Hann-windowed
//! overlap-add: analysis frames are read `rate` times further apart than
//! they are written.

use serde_json::{json, Value};

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::engine::AudioBuffer;
use crate::error::{DocsError, Result};
use crate::impl_transform_common;

/// Analysis/synthesis frame length
const FRAME_LENGTH: usize = 1024;

/// Distance between synthesis frames
const SYNTHESIS_HOP: usize = 256;

/// Overlap-add time stretching
#[derive(Debug, Clone)]
pub struct TimeStretch {
    min_rate: f32,
    max_rate: f32,
    leave_length_unchanged: bool,
    p: f32,
}

impl Default for TimeStretch {
    fn default() -> Self {
        Self {
            min_rate: 0.8,
            max_rate: 1.25,
            leave_length_unchanged: true,
            p: 0.5,
        }
    }
}

impl TimeStretch {
    /// Create with the rate drawn from `min_rate..max_rate`
    ///
    /// Rates above 1 speed the signal up. With `leave_length_unchanged` the
    /// result is padded or cut back to the input length.
    pub fn new(min_rate: f32, max_rate: f32, leave_length_unchanged: bool, p: f32) -> Result<Self> {
        validate_range("rate", min_rate, max_rate)?;
        validate_probability(p)?;
        if min_rate <= 0.0 {
            return Err(DocsError::InvalidParameter {
                param: "min_rate".to_string(),
                value: min_rate.to_string(),
                expected: "greater than 0".to_string(),
            });
        }
        Ok(Self {
            min_rate,
            max_rate,
            leave_length_unchanged,
            p,
        })
    }
}

/// Stretch `samples` by `rate`, returning about `len / rate` samples
fn stretch(samples: &[f32], rate: f64) -> Vec<f32> {
    let out_len = (samples.len() as f64 / rate).round() as usize;
    if out_len == 0 {
        return Vec::new();
    }

    let window: Vec<f32> = (0..FRAME_LENGTH)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / FRAME_LENGTH as f32).cos())
        .collect();
    let analysis_hop = SYNTHESIS_HOP as f64 * rate;
    let num_frames = out_len.div_ceil(SYNTHESIS_HOP) + 1;

    let mut out = vec![0.0_f32; num_frames * SYNTHESIS_HOP + FRAME_LENGTH];
    let mut norm = vec![0.0_f32; out.len()];

    for frame in 0..num_frames {
        let read = (frame as f64 * analysis_hop).round() as usize;
        let write = frame * SYNTHESIS_HOP;
        for (i, &w) in window.iter().enumerate() {
            let sample = samples.get(read + i).copied().unwrap_or(0.0);
            out[write + i] += w * sample;
            norm[write + i] += w;
        }
    }

    out.truncate(out_len);
    for (sample, &weight) in out.iter_mut().zip(&norm) {
        if weight > 1e-3 {
            *sample /= weight;
        } else {
            *sample = 0.0;
        }
    }
    out
}

impl Transform for TimeStretch {
    impl_transform_common!("TimeStretch");

    fn params(&self) -> Value {
        json!({
            "min_rate": self.min_rate,
            "max_rate": self.max_rate,
            "leave_length_unchanged": self.leave_length_unchanged,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let rate = rng.uniform(self.min_rate, self.max_rate) as f64;
        let original_len = input.num_samples();
        input.map_channels(|ch| {
            let mut out = stretch(ch, rate);
            if self.leave_length_unchanged {
                out.resize(original_len, 0.0);
            }
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::tone;

    #[test]
    fn test_faster_rate_shortens() {
        let input = tone();
        let mut ts = TimeStretch::new(1.25, 1.25, false, 1.0).unwrap();
        let out = ts.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out.num_samples(), 12800);
    }

    #[test]
    fn test_pinned_length_pads() {
        let input = tone();
        let mut ts = TimeStretch::new(1.25, 1.25, true, 1.0).unwrap();
        let out = ts.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out.num_samples(), input.num_samples());
        assert!(out.channel(0)[12800..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_unit_rate_is_near_identity() {
        let input = tone();
        let out = stretch(input.channel(0), 1.0);
        assert_eq!(out.len(), input.num_samples());
        for (o, i) in out[SYNTHESIS_HOP..].iter().zip(&input.channel(0)[SYNTHESIS_HOP..]) {
            assert!((o - i).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        assert!(TimeStretch::new(0.0, 1.0, true, 1.0).is_err());
    }
}
