//! TanhDistortion
//!
//! Soft clipping through tanh. The drive is set so that a chosen
//! percentile of the absolute signal lands at the knee, and the result is
//! brought back to the input's RMS level.

use serde_json::{json, Value};

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::engine::{buffer, AudioBuffer};
use crate::error::Result;
use crate::impl_transform_common;

/// tanh waveshaping distortion
#[derive(Debug, Clone)]
pub struct TanhDistortion {
    min_distortion: f32,
    max_distortion: f32,
    p: f32,
}

impl Default for TanhDistortion {
    fn default() -> Self {
        Self {
            min_distortion: 0.01,
            max_distortion: 0.7,
            p: 0.5,
        }
    }
}

impl TanhDistortion {
    /// Create with the distortion amount drawn from the given range (0..=1)
    pub fn new(min_distortion: f32, max_distortion: f32, p: f32) -> Result<Self> {
        validate_range("distortion", min_distortion, max_distortion)?;
        validate_probability(p)?;
        Ok(Self {
            min_distortion: min_distortion.clamp(0.0, 1.0),
            max_distortion: max_distortion.clamp(0.0, 1.0),
            p,
        })
    }
}

/// Linearly interpolated percentile (0..=100) of `values`
fn percentile(values: &[f32], q: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let rank = (q as f64 / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = (rank - lower as f64) as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn distort(samples: &[f32], amount: f32) -> Vec<f32> {
    let magnitudes: Vec<f32> = samples.iter().map(|s| s.abs()).collect();
    let threshold = percentile(&magnitudes, 100.0 - 99.0 * amount);
    let gain = 0.5 / (threshold + 1e-6);

    let mut out: Vec<f32> = samples.iter().map(|&s| (gain * s).tanh()).collect();

    let input_rms = buffer::rms(samples);
    let output_rms = buffer::rms(&out);
    if input_rms > 1e-9 && output_rms > 0.0 {
        let post_gain = input_rms / output_rms;
        out.iter_mut().for_each(|s| *s *= post_gain);
    }
    out
}

impl Transform for TanhDistortion {
    impl_transform_common!("TanhDistortion");

    fn params(&self) -> Value {
        json!({
            "min_distortion": self.min_distortion,
            "max_distortion": self.max_distortion,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let amount = rng.uniform(self.min_distortion, self.max_distortion);
        input.map_channels(|ch| Ok(distort(ch, amount)))
    }
}
