//! AddBackgroundNoise
//!
//! Mixes a background recording into the signal at a drawn signal-to-noise
//! ratio. The recording is picked once, at construction, from a file or a
//! directory of WAV files.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{validate_probability, validate_range, RandomSources, Transform};
use crate::engine::{buffer, db_to_linear, linear_to_db, load_audio, AudioBuffer};
use crate::error::{DocsError, Result};
use crate::impl_transform_common;

/// Background noise mixed in at a random SNR
#[derive(Debug, Clone)]
pub struct AddBackgroundNoise {
    sound_file: PathBuf,
    min_snr_db: f32,
    max_snr_db: f32,
    p: f32,
}

impl AddBackgroundNoise {
    /// Create from a sound file or a directory of WAV files
    ///
    /// When `sounds_path` is a directory one file is chosen with the host
    /// random source, so construction consumes randomness.
    pub fn new(
        sounds_path: &Path,
        min_snr_db: f32,
        max_snr_db: f32,
        p: f32,
        rng: &mut RandomSources,
    ) -> Result<Self> {
        validate_range("snr_db", min_snr_db, max_snr_db)?;
        validate_probability(p)?;

        let candidates = find_sound_files(sounds_path)?;
        let sound_file = candidates[rng.host().gen_range(0..candidates.len())].clone();
        debug!("background noise source: {}", sound_file.display());

        Ok(Self {
            sound_file,
            min_snr_db,
            max_snr_db,
            p,
        })
    }

    /// The recording that will be mixed in
    pub fn sound_file(&self) -> &Path {
        &self.sound_file
    }
}

/// Collect WAV files under `path`, searching subdirectories, in a stable order
fn find_sound_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(DocsError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let files: Vec<PathBuf> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|file| {
            file.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
        })
        .collect();

    if files.is_empty() {
        return Err(DocsError::FileNotFound {
            path: format!("{} (no WAV files)", path.display()),
            source: None,
        });
    }
    Ok(files)
}

/// Take `len` samples of `noise`, looping it when too short
fn fit_noise(noise: &[f32], len: usize, rng: &mut RandomSources) -> Vec<f32> {
    if noise.len() >= len {
        let offset = rng.host().gen_range(0..=noise.len() - len);
        noise[offset..offset + len].to_vec()
    } else {
        noise.iter().copied().cycle().take(len).collect()
    }
}

impl Transform for AddBackgroundNoise {
    impl_transform_common!("AddBackgroundNoise");

    fn params(&self) -> Value {
        json!({
            "sound_file": self.sound_file.display().to_string(),
            "min_snr_db": self.min_snr_db,
            "max_snr_db": self.max_snr_db,
            "p": self.p,
        })
    }

    fn transform(&mut self, input: &AudioBuffer, rng: &mut RandomSources) -> Result<AudioBuffer> {
        let snr_db = rng.uniform(self.min_snr_db, self.max_snr_db);
        let noise = load_audio(&self.sound_file, input.sample_rate())?;
        let noise = fit_noise(noise.channel(0), input.num_samples(), rng);

        let noise_rms = buffer::rms(&noise);
        if noise_rms == 0.0 {
            warn!(
                "background sound {} is silent; leaving signal unchanged",
                self.sound_file.display()
            );
            return Ok(input.clone());
        }

        let target_noise_rms = input.rms() / db_to_linear(snr_db);
        let gain = target_noise_rms / noise_rms;
        debug!(snr_db, noise_gain_db = linear_to_db(gain), "mixing background");
        input.map_channels(|ch| {
            Ok(ch
                .iter()
                .zip(&noise)
                .map(|(&s, &n)| s + gain * n)
                .collect())
        })
    }
}
