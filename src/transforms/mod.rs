//! Audio Transforms
//!
//! The transforms that have documentation examples. Each maps a buffer and
//! its sample rate to a new buffer at the same rate, and all share the
//! `Transform` trait so recipes can treat them uniformly.

mod background_noise;
mod gaussian_noise;
mod parametric_eq;
pub mod random;
mod room_simulator;
mod shift;
mod tanh_distortion;
mod time_stretch;
mod trim;

pub use background_noise::AddBackgroundNoise;
pub use gaussian_noise::AddGaussianNoise;
pub use parametric_eq::SevenBandParametricEQ;
pub use random::RandomSources;
pub use room_simulator::RoomSimulator;
pub use shift::Shift;
pub use tanh_distortion::TanhDistortion;
pub use time_stretch::TimeStretch;
pub use trim::Trim;

use rand::Rng;
use serde_json::Value;

use crate::engine::AudioBuffer;
use crate::error::{DocsError, Result};

/// An operation mapping an audio buffer to a modified buffer
pub trait Transform {
    /// Type name, also used as the example identifier
    fn name(&self) -> &'static str;

    /// Probability that `apply` actually transforms its input
    fn probability(&self) -> f32;

    /// Configured parameters, for logging
    fn params(&self) -> Value;

    /// Transform unconditionally
    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer>;

    /// Transform with probability `probability()`, otherwise return a copy
    fn apply(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let draw: f32 = rng.host().gen();
        if draw < self.probability() {
            self.transform(input, rng)
        } else {
            Ok(input.clone())
        }
    }
}

/// Check that `min..=max` is a valid, ordered range
pub(crate) fn validate_range(param: &str, min: f32, max: f32) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(DocsError::InvalidParameter {
            param: param.to_string(),
            value: format!("{}..{}", min, max),
            expected: "finite range with min <= max".to_string(),
        });
    }
    Ok(())
}

/// Check that `p` is a probability
pub(crate) fn validate_probability(p: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(DocsError::InvalidParameter {
            param: "p".to_string(),
            value: p.to_string(),
            expected: "0.0 to 1.0".to_string(),
        });
    }
    Ok(())
}

/// Helper macro to implement the common Transform trait methods
#[macro_export]
macro_rules! impl_transform_common {
    ($name:expr) => {
        fn name(&self) -> &'static str {
            $name
        }

        fn probability(&self) -> f32 {
            self.p
        }
    };
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::tone;

    #[test]
    fn test_zero_probability_passes_through() {
        let mut shift = Shift::new(0.5, 0.5, true, 0.0).unwrap();
        let input = tone();
        let output = shift.apply(&input, &mut RandomSources::seeded(1)).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("x", 1.0, 1.0).is_ok());
        assert!(validate_range("x", 2.0, 1.0).is_err());
        assert!(validate_range("x", f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability(1.0).is_ok());
        assert!(validate_probability(1.5).is_err());
    }
}
