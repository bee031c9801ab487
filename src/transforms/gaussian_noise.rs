//! AddGaussianNoise
//!
//! Adds white Gaussian noise with a randomly drawn standard deviation.

use serde_json::{json, Value};

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::impl_transform_common;

/// Additive Gaussian noise
#[derive(Debug, Clone)]
pub struct AddGaussianNoise {
    min_amplitude: f32,
    max_amplitude: f32,
    p: f32,
}

impl Default for AddGaussianNoise {
    fn default() -> Self {
        Self {
            min_amplitude: 0.001,
            max_amplitude: 0.015,
            p: 0.5,
        }
    }
}

impl AddGaussianNoise {
    /// Create with the noise standard deviation drawn from the given range
    pub fn new(min_amplitude: f32, max_amplitude: f32, p: f32) -> Result<Self> {
        validate_range("amplitude", min_amplitude, max_amplitude)?;
        validate_probability(p)?;
        Ok(Self {
            min_amplitude,
            max_amplitude,
            p,
        })
    }
}

impl Transform for AddGaussianNoise {
    impl_transform_common!("AddGaussianNoise");

    fn params(&self) -> Value {
        json!({
            "min_amplitude": self.min_amplitude,
            "max_amplitude": self.max_amplitude,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let amplitude = rng.uniform(self.min_amplitude, self.max_amplitude);
        input.map_channels(|ch| {
            Ok(ch
                .iter()
                .map(|&s| s + amplitude * rng.standard_normal())
                .collect())
        })
    }
}
