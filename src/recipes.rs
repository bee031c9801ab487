//! Example recipes
//!
//! One function per documented transform. Every recipe seeds the random
//! sources, builds its transform with `p = 1.0`, cuts the fixed window out
//! of the reference speech clip and applies the transform once. Running a
//! recipe twice gives bit-identical buffers.

use tracing::{debug, info};

use crate::config::{ReferenceAssets, EXAMPLE_DURATION_SECS, EXAMPLE_SAMPLE_RATE, EXAMPLE_SEED};
use crate::engine::{load_audio, AudioPair};
use crate::error::{DocsError, Result};
use crate::transforms::{
    AddBackgroundNoise, AddGaussianNoise, RandomSources, RoomSimulator, SevenBandParametricEQ,
    Shift, TanhDistortion, TimeStretch, Transform, Trim,
};

/// Seed, build, load, crop and apply
///
/// `build` runs after seeding so any randomness it consumes is part of the
/// reproducible stream.
fn run<T, F>(assets: &ReferenceAssets, build: F) -> Result<AudioPair>
where
    T: Transform,
    F: FnOnce(&mut RandomSources) -> Result<T>,
{
    let mut rng = RandomSources::seeded(EXAMPLE_SEED);
    let mut transform = build(&mut rng)?;

    let mut original = load_audio(&assets.speech, EXAMPLE_SAMPLE_RATE)?;
    let window = (EXAMPLE_DURATION_SECS * EXAMPLE_SAMPLE_RATE as f64) as usize;
    original.truncate(window);

    info!(
        transform = transform.name(),
        samples = original.num_samples(),
        "generating example"
    );
    debug!("params: {}", transform.params());

    let transformed = transform.apply(&original, &mut rng)?;
    if !transformed.is_finite() {
        return Err(DocsError::transform(
            transform.name(),
            "output contains NaN or infinite samples",
        ));
    }
    AudioPair::new(original, transformed, EXAMPLE_SAMPLE_RATE)
}

pub fn add_background_noise(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |rng| {
        AddBackgroundNoise::new(&assets.background_noise, 5.0, 5.0, 1.0, rng)
    })
}

pub fn add_gaussian_noise(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| AddGaussianNoise::new(0.01, 0.01, 1.0))
}

/// Room parameters stay randomized; the seed fixes them
pub fn room_simulator(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| RoomSimulator::new(1.0))
}

pub fn seven_band_parametric_eq(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| SevenBandParametricEQ::new(3.0, 3.0, 1.0))
}

pub fn shift(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| Shift::new(0.75, 0.75, true, 1.0))
}

pub fn tanh_distortion(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| TanhDistortion::new(0.25, 0.25, 1.0))
}

pub fn time_stretch(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| TimeStretch::new(1.25, 1.25, true, 1.0))
}

pub fn trim(assets: &ReferenceAssets) -> Result<AudioPair> {
    run(assets, |_| Trim::new(30.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{synthesize_speech, write_wav};
    use tempfile::tempdir;

    #[test]
    fn test_window_is_cropped() {
        let dir = tempdir().unwrap();
        let assets = ReferenceAssets::in_dir(dir.path());
        write_wav(&synthesize_speech(6.0, 16000), &assets.speech).unwrap();

        let pair = shift(&assets).unwrap();
        assert_eq!(pair.original().num_samples(), 75200);
        assert_eq!(pair.transformed().num_samples(), 75200);
    }

    #[test]
    fn test_short_clip_is_used_whole() {
        let dir = tempdir().unwrap();
        let assets = ReferenceAssets::in_dir(dir.path());
        write_wav(&synthesize_speech(2.0, 16000), &assets.speech).unwrap();

        let pair = add_gaussian_noise(&assets).unwrap();
        assert_eq!(pair.original().num_samples(), 32000);
    }

    #[test]
    fn test_missing_speech_propagates() {
        let dir = tempdir().unwrap();
        let assets = ReferenceAssets::in_dir(dir.path());
        assert!(trim(&assets).is_err());
    }
}
