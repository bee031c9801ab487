//! SevenBandParametricEQ
//!
//! A low shelf, five peaking bands and a high shelf at fixed centre
//! frequencies, each with its own randomly drawn gain.

use serde_json::{json, Value};
use tracing::debug;

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::dsp::{Biquad, BiquadCoeffs, FilterType};
use crate::engine::AudioBuffer;
use crate::error::Result;
use crate::impl_transform_common;

/// Band layout: (filter type, centre frequency in Hz, Q)
const BANDS: [(FilterType, f64, f64); 7] = [
    (FilterType::LowShelf, 42.0, 0.707),
    (FilterType::Peak, 100.0, 1.4),
    (FilterType::Peak, 240.0, 1.4),
    (FilterType::Peak, 575.0, 1.4),
    (FilterType::Peak, 1370.0, 1.4),
    (FilterType::Peak, 3280.0, 1.4),
    (FilterType::HighShelf, 7840.0, 0.707),
];

/// Seven-band equalizer with random per-band gain
#[derive(Debug, Clone)]
pub struct SevenBandParametricEQ {
    min_gain_db: f32,
    max_gain_db: f32,
    p: f32,
}

impl Default for SevenBandParametricEQ {
    fn default() -> Self {
        Self {
            min_gain_db: -12.0,
            max_gain_db: 12.0,
            p: 0.5,
        }
    }
}

impl SevenBandParametricEQ {
    /// Create with every band's gain drawn from `min_gain_db..max_gain_db`
    pub fn new(min_gain_db: f32, max_gain_db: f32, p: f32) -> Result<Self> {
        validate_range("gain_db", min_gain_db, max_gain_db)?;
        validate_probability(p)?;
        Ok(Self {
            min_gain_db,
            max_gain_db,
            p,
        })
    }
}

impl Transform for SevenBandParametricEQ {
    impl_transform_common!("SevenBandParametricEQ");

    fn params(&self) -> Value {
        let bands: Vec<Value> = BANDS
            .iter()
            .map(|(filter_type, freq, q)| json!({ "type": filter_type, "freq_hz": freq, "q": q }))
            .collect();
        json!({
            "min_gain_db": self.min_gain_db,
            "max_gain_db": self.max_gain_db,
            "bands": bands,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let sample_rate = input.sample_rate() as f64;
        let nyquist = sample_rate / 2.0;

        // Draw every gain, even for skipped bands, so the stream is stable
        let gains: Vec<f32> = BANDS
            .iter()
            .map(|_| rng.uniform(self.min_gain_db, self.max_gain_db))
            .collect();

        let sections: Vec<Biquad> = BANDS
            .iter()
            .zip(&gains)
            .filter(|((_, freq, _), _)| *freq < nyquist)
            .map(|(&(filter_type, freq, q), &gain)| {
                debug!(?filter_type, freq, gain, "eq band");
                Biquad::new(BiquadCoeffs::calculate(
                    filter_type,
                    sample_rate,
                    freq,
                    gain as f64,
                    q,
                ))
            })
            .collect();

        input.map_channels(|ch| {
            Ok(sections
                .iter()
                .fold(ch.to_vec(), |signal, section| section.filter(&signal)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::tone;

    #[test]
    fn test_uniform_boost_raises_level() {
        let input = tone();
        let mut eq = SevenBandParametricEQ::new(3.0, 3.0, 1.0).unwrap();
        let out = eq.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert_eq!(out.num_samples(), input.num_samples());
        assert!(out.rms() > input.rms());
        assert!(out.is_finite());
    }

    #[test]
    fn test_zero_gain_is_near_transparent() {
        let input = tone();
        let mut eq = SevenBandParametricEQ::new(0.0, 0.0, 1.0).unwrap();
        let out = eq.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        for (o, i) in out.channel(0).iter().zip(input.channel(0)) {
            assert!((o - i).abs() < 1e-4);
        }
    }

    #[test]
    fn test_params_list_band_layout() {
        let params = SevenBandParametricEQ::new(-3.0, 3.0, 1.0).unwrap().params();
        let bands = params["bands"].as_array().unwrap();
        assert_eq!(bands.len(), 7);
        assert_eq!(bands[0]["type"], "low_shelf");
        assert_eq!(bands[3]["type"], "peak");
        assert_eq!(bands[6]["type"], "high_shelf");
        assert_eq!(bands[6]["freq_hz"], 7840.0);
    }

    #[test]
    fn test_low_rate_skips_high_bands() {
        let input = AudioBuffer::from_mono(vec![0.1; 4000], 8000);
        let mut eq = SevenBandParametricEQ::new(3.0, 3.0, 1.0).unwrap();
        let out = eq.apply(&input, &mut RandomSources::seeded(345)).unwrap();
        assert!(out.is_finite());
        assert_eq!(out.sample_rate(), 8000);
    }
}
