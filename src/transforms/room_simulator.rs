//! RoomSimulator
//!
//! Places the signal in a simulated room using the Freeverb network. Room
//! size and wall damping are drawn per call; the output keeps a reverb tail
//! beyond the end of the input unless the length is pinned.

use serde_json::{json, Value};
use tracing::debug;

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::dsp::Freeverb;
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::impl_transform_common;

/// Reverb tail appended to the input, in seconds
const TAIL_SECS: f64 = 0.5;

/// Freeverb's standard wet gain
const WET_SCALE: f32 = 3.0;

/// Simulated room reverberation
#[derive(Debug, Clone)]
pub struct RoomSimulator {
    min_room_size: f32,
    max_room_size: f32,
    min_damping: f32,
    max_damping: f32,
    wet_level: f32,
    dry_level: f32,
    leave_length_unchanged: bool,
    p: f32,
}

impl Default for RoomSimulator {
    fn default() -> Self {
        Self {
            min_room_size: 0.4,
            max_room_size: 0.9,
            min_damping: 0.2,
            max_damping: 0.6,
            wet_level: 0.5,
            dry_level: 0.5,
            leave_length_unchanged: false,
            p: 0.5,
        }
    }
}

impl RoomSimulator {
    /// Default room ranges with the given probability
    pub fn new(p: f32) -> Result<Self> {
        validate_probability(p)?;
        Ok(Self {
            p,
            ..Self::default()
        })
    }

    /// Override the room size range (0..=1)
    pub fn with_room_size(mut self, min: f32, max: f32) -> Result<Self> {
        validate_range("room_size", min, max)?;
        self.min_room_size = min;
        self.max_room_size = max;
        Ok(self)
    }

    /// Override the damping range (0..=1)
    pub fn with_damping(mut self, min: f32, max: f32) -> Result<Self> {
        validate_range("damping", min, max)?;
        self.min_damping = min;
        self.max_damping = max;
        Ok(self)
    }

    /// Keep the output the same length as the input
    pub fn leave_length_unchanged(mut self, unchanged: bool) -> Self {
        self.leave_length_unchanged = unchanged;
        self
    }
}

impl Transform for RoomSimulator {
    impl_transform_common!("RoomSimulator");

    fn params(&self) -> Value {
        json!({
            "min_room_size": self.min_room_size,
            "max_room_size": self.max_room_size,
            "min_damping": self.min_damping,
            "max_damping": self.max_damping,
            "wet_level": self.wet_level,
            "dry_level": self.dry_level,
            "leave_length_unchanged": self.leave_length_unchanged,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let room_size = rng.uniform(self.min_room_size, self.max_room_size);
        let damping = rng.uniform(self.min_damping, self.max_damping);
        debug!(room_size, damping, "room drawn");

        let tail = if self.leave_length_unchanged {
            0
        } else {
            (TAIL_SECS * input.sample_rate() as f64) as usize
        };

        input.map_channels(|ch| {
            let mut reverb = Freeverb::new(input.sample_rate(), room_size, damping);
            Ok(ch
                .iter()
                .copied()
                .chain(std::iter::repeat(0.0).take(tail))
                .map(|s| self.dry_level * s + self.wet_level * WET_SCALE * reverb.process_sample(s))
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::tone;

    #[test]
    fn test_output_has_tail() {
        let input = tone();
        let mut room = RoomSimulator::new(1.0).unwrap();
        let out = room.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out.num_samples(), input.num_samples() + 8000);
        let tail = &out.channel(0)[input.num_samples()..];
        assert!(tail.iter().any(|&s| s != 0.0));
        assert!(out.is_finite());
    }

    #[test]
    fn test_pinned_length() {
        let input = tone();
        let mut room = RoomSimulator::new(1.0).unwrap().leave_length_unchanged(true);
        let out = room.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out.num_samples(), input.num_samples());
    }

    #[test]
    fn test_larger_room_rings_longer() {
        let input = tone();
        let late_tail_rms = |size: f32| {
            let mut room = RoomSimulator::new(1.0)
                .unwrap()
                .with_room_size(size, size)
                .unwrap()
                .with_damping(0.2, 0.2)
                .unwrap();
            let out = room.apply(&input, &mut RandomSources::seeded(345)).unwrap();
            crate::engine::buffer::rms(&out.channel(0)[input.num_samples() + 4000..])
        };
        assert!(late_tail_rms(0.9) > late_tail_rms(0.1));
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        assert!(RoomSimulator::new(1.0).unwrap().with_room_size(0.9, 0.4).is_err());
        assert!(RoomSimulator::new(1.0).unwrap().with_damping(0.6, 0.2).is_err());
    }

    #[test]
    fn test_seeded_rooms_match() {
        let input = tone();
        let run = || {
            RoomSimulator::new(1.0)
                .unwrap()
                .apply(&input, &mut RandomSources::seeded(345))
                .unwrap()
        };
        assert_eq!(run(), run());
    }
}
