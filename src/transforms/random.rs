//! Seeded random sources
//!
//! Transforms draw from two independent generators: the host source for
//! scalar decisions (apply or not, parameter values, file choice) and the
//! array source for bulk noise. Both are seeded with the same value so an
//! example is reproducible from a single constant.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The pair of generators a transform may consume
#[derive(Debug, Clone)]
pub struct RandomSources {
    host: StdRng,
    array: StdRng,
}

impl RandomSources {
    /// Seed both sources with `seed`
    pub fn seeded(seed: u64) -> Self {
        Self {
            host: StdRng::seed_from_u64(seed),
            array: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator for scalar draws
    pub fn host(&mut self) -> &mut StdRng {
        &mut self.host
    }

    /// Generator for bulk sample draws
    pub fn array(&mut self) -> &mut StdRng {
        &mut self.array
    }

    /// Uniform draw in `[min, max)` from the host source
    ///
    /// Always consumes one value, so collapsing a range to a single point
    /// does not shift later draws. Returns exactly `min` when `min == max`.
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        let unit: f32 = self.host.gen();
        if min == max {
            min
        } else {
            min + (max - min) * unit
        }
    }

    /// Standard normal draw from the array source (Box-Muller)
    pub fn standard_normal(&mut self) -> f32 {
        let u1: f64 = 1.0 - self.array.gen::<f64>();
        let u2: f64 = self.array.gen();
        ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
    }
}
