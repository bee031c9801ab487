//! Audio file I/O for waveform-docs
//!
//! Handles loading reference assets and writing the exported audio
//! artifacts. The only format is WAV; exports are written as 32-bit float
//! so that reloading an artifact reproduces the exported samples exactly.
//!
//! Sample rate conversion on load uses linear interpolation.

use std::f32::consts::PI;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::engine::buffer::AudioBuffer;
use crate::error::{DocsError, Result};

/// Load an audio file as mono at `target_sample_rate`
///
/// Multi-channel files are averaged down to one channel and resampled when
/// the file's rate differs from the target.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `EmptyAudio` - If the file holds no samples
pub fn load_audio(path: &Path, target_sample_rate: u32) -> Result<AudioBuffer> {
    let native = read_wav(path)?;
    if native.is_empty() {
        return Err(DocsError::EmptyAudio);
    }

    let mono = native.to_mono();
    let samples = if native.sample_rate() != target_sample_rate {
        debug!(
            from = native.sample_rate(),
            to = target_sample_rate,
            "resampling {}",
            path.display()
        );
        resample_linear(
            &mono,
            target_sample_rate as f64 / native.sample_rate() as f64,
        )
    } else {
        mono
    };

    Ok(AudioBuffer::from_mono(samples, target_sample_rate))
}

/// Read a WAV file at its native sample rate and channel count
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(DocsError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| DocsError::InvalidAudio {
        reason: format!("Failed to open WAV file {}: {}", path.display(), e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(DocsError::UnsupportedFormat {
            format: "audio with zero channels".to_string(),
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    AudioBuffer::from_channels(deinterleave(&interleaved, channels), spec.sample_rate)
}

/// Write a buffer as a 32-bit float WAV file
pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for sample in interleave(buffer.channels()) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Generate a mono sine wave
pub fn generate_test_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> AudioBuffer {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;

    let samples = (0..num_samples)
        .map(|i| (angular_freq * i as f32).sin())
        .collect();

    AudioBuffer::from_mono(samples, sample_rate)
}

/// Synthesize a speech-like reference clip
///
/// Harmonic "syllables" with a glide and a moving formant, framed by
/// 0.4 s of leading and 0.5 s of trailing silence.
pub fn synthesize_speech(duration_secs: f32, sample_rate: u32) -> AudioBuffer {
    let sr = sample_rate as f32;
    let num_samples = (duration_secs * sr) as usize;
    let mut samples = vec![0.0_f32; num_samples];

    let lead = (0.4 * sr) as usize;
    let voiced_end = num_samples.saturating_sub((0.5 * sr) as usize);
    let syllable = (0.24 * sr) as usize;
    let gap = (0.06 * sr) as usize;

    let mut start = lead;
    let mut index = 0usize;
    while syllable > 0 && start + syllable <= voiced_end {
        let f0 = 110.0 + 15.0 * (index % 5) as f32;
        let formant = 500.0 + 250.0 * (index % 4) as f32;

        for i in 0..syllable {
            let t = i as f32 / sr;
            let progress = i as f32 / syllable as f32;
            let envelope = (PI * progress).sin().powi(2);
            let pitch = f0 * (1.0 + 0.1 * progress);

            let mut value = 0.0;
            for harmonic in 1..=12 {
                let freq = pitch * harmonic as f32;
                if freq >= sr / 2.0 {
                    break;
                }
                let weight =
                    1.0 / (1.0 + ((freq - formant) / 300.0).powi(2)) + 0.05 / harmonic as f32;
                value += weight * (2.0 * PI * freq * t).sin();
            }
            samples[start + i] = 0.12 * envelope * value;
        }

        start += syllable + gap;
        index += 1;
    }

    AudioBuffer::from_mono(samples, sample_rate)
}

/// Synthesize a background bed: low-passed noise under a soft chord
pub fn synthesize_background(duration_secs: f32, sample_rate: u32, seed: u64) -> AudioBuffer {
    let sr = sample_rate as f32;
    let num_samples = (duration_secs * sr) as usize;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut lowpassed = 0.0_f32;
    let samples = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sr;
            let white: f32 = rng.gen_range(-1.0..1.0);
            lowpassed += 0.05 * (white - lowpassed);
            let chord: f32 = [220.0_f32, 277.18, 329.63]
                .iter()
                .map(|f| (2.0 * PI * f * t).sin())
                .sum();
            0.3 * lowpassed + 0.05 * chord
        })
        .collect();

    AudioBuffer::from_mono(samples, sample_rate)
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let invalid = |bits: &str, e: hound::Error| DocsError::InvalidAudio {
        reason: format!("Failed to read {} samples: {}", bits, e),
        source: Some(Box::new(e)),
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| invalid("float", e)),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("8-bit", e)),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("16-bit", e)),
            // 24-bit stored as i32 in hound
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("24-bit", e)),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid("32-bit int", e)),
            _ => Err(DocsError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for (i, sample) in samples.iter().take(frames * channels).enumerate() {
        result[i % channels].push(*sample);
    }

    result
}

/// Interleave channels from [[L,L,...], [R,R,...]] to [L,R,L,R,...]
fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = channels.first() else {
        return Vec::new();
    };

    let frames = first.len();
    let mut result = Vec::with_capacity(frames * channels.len());

    for frame in 0..frames {
        for channel in channels {
            result.push(channel[frame]);
        }
    }

    result
}

/// Linear interpolation resampling
///
/// `ratio` is target rate over source rate.
pub(crate) fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ============================================================================
// Tests
// ============================================================================
