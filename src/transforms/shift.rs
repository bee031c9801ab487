//! Shift
//!
//! Moves the signal forwards or backwards in time by a fraction of its
//! length. With rollover the samples that fall off one end re-enter at the
//! other; without it the vacated region is silent.

use serde_json::{json, Value};

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::impl_transform_common;

/// Time shift by a fraction of the buffer length
#[derive(Debug, Clone)]
pub struct Shift {
    min_fraction: f32,
    max_fraction: f32,
    rollover: bool,
    p: f32,
}

impl Default for Shift {
    fn default() -> Self {
        Self {
            min_fraction: -0.5,
            max_fraction: 0.5,
            rollover: true,
            p: 0.5,
        }
    }
}

impl Shift {
    /// Create a shift drawing its fraction from `min_fraction..max_fraction`
    ///
    /// Positive fractions move the signal later in time.
    pub fn new(min_fraction: f32, max_fraction: f32, rollover: bool, p: f32) -> Result<Self> {
        validate_range("fraction", min_fraction, max_fraction)?;
        validate_probability(p)?;
        Ok(Self {
            min_fraction,
            max_fraction,
            rollover,
            p,
        })
    }
}

/// Shift `samples` right by `amount` (left when negative)
fn shift_samples(samples: &[f32], amount: isize, rollover: bool) -> Vec<f32> {
    let len = samples.len();
    if len == 0 {
        return Vec::new();
    }

    if rollover {
        let mut out = samples.to_vec();
        let offset = amount.rem_euclid(len as isize) as usize;
        out.rotate_right(offset);
        return out;
    }

    let mut out = vec![0.0; len];
    let magnitude = amount.unsigned_abs().min(len);
    if amount >= 0 {
        out[magnitude..].copy_from_slice(&samples[..len - magnitude]);
    } else {
        out[..len - magnitude].copy_from_slice(&samples[magnitude..]);
    }
    out
}

impl Transform for Shift {
    impl_transform_common!("Shift");

    fn params(&self) -> Value {
        json!({
            "min_fraction": self.min_fraction,
            "max_fraction": self.max_fraction,
            "rollover": self.rollover,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let fraction = rng.uniform(self.min_fraction, self.max_fraction);
        let amount = (fraction as f64 * input.num_samples() as f64).round() as isize;
        input.map_channels(|ch| Ok(shift_samples(ch, amount, self.rollover)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollover_rotates() {
        assert_eq!(
            shift_samples(&[1.0, 2.0, 3.0, 4.0], 1, true),
            vec![4.0, 1.0, 2.0, 3.0]
        );
        assert_eq!(
            shift_samples(&[1.0, 2.0, 3.0, 4.0], -1, true),
            vec![2.0, 3.0, 4.0, 1.0]
        );
    }

    #[test]
    fn test_no_rollover_fills_silence() {
        assert_eq!(
            shift_samples(&[1.0, 2.0, 3.0, 4.0], 2, false),
            vec![0.0, 0.0, 1.0, 2.0]
        );
        assert_eq!(
            shift_samples(&[1.0, 2.0, 3.0, 4.0], -3, false),
            vec![4.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_three_quarter_shift() {
        let input = AudioBuffer::from_mono((0..8).map(|i| i as f32).collect(), 16000);
        let mut shift = Shift::new(0.75, 0.75, true, 1.0).unwrap();
        let out = shift.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out.channel(0), &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 0.0, 1.0]);
        assert_eq!(out.sample_rate(), 16000);
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(Shift::new(0.5, -0.5, true, 1.0).is_err());
    }
}
