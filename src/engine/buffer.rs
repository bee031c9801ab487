//! Audio Buffer Management
//!
//! Provides the buffer and pair types that flow through the pipeline.
//! Samples are 32-bit float, stored channel-major.

use crate::error::{DocsError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Peak absolute value of a slice (0.0 when empty)
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Root mean square of a slice (0.0 when empty)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Multi-channel audio with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// One vector per channel, all the same length
    samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a silent buffer
    pub fn new(num_channels: usize, num_samples: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0; num_samples]; num_channels.max(1)],
            sample_rate,
        }
    }

    /// Create a mono buffer from samples
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: vec![samples],
            sample_rate,
        }
    }

    /// Create a buffer from per-channel sample vectors
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(DocsError::UnsupportedFormat {
                format: "audio with zero channels".to_string(),
            });
        };
        let len = first.len();
        if channels.iter().any(|ch| ch.len() != len) {
            return Err(DocsError::InvalidAudio {
                reason: "channels have different lengths".to_string(),
                source: None,
            });
        }
        Ok(Self {
            samples: channels,
            sample_rate,
        })
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples per channel
    pub fn num_samples(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.num_samples() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.samples[channel]
    }

    /// All channels
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.samples
    }

    /// Peak absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|ch| peak(ch)).fold(0.0_f32, f32::max)
    }

    /// RMS over all channels
    pub fn rms(&self) -> f32 {
        let all: Vec<f32> = self.samples.iter().flatten().copied().collect();
        rms(&all)
    }

    /// Average of all channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.num_channels() == 1 {
            return self.samples[0].clone();
        }
        let scale = 1.0 / self.num_channels() as f32;
        (0..self.num_samples())
            .map(|i| self.samples.iter().map(|ch| ch[i]).sum::<f32>() * scale)
            .collect()
    }

    /// Keep at most `num_samples` samples per channel
    pub fn truncate(&mut self, num_samples: usize) {
        for channel in &mut self.samples {
            channel.truncate(num_samples);
        }
    }

    /// Build a new buffer at the same sample rate by mapping every channel
    pub fn map_channels<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&[f32]) -> Result<Vec<f32>>,
    {
        let channels = self
            .samples
            .iter()
            .map(|ch| f(ch))
            .collect::<Result<Vec<_>>>()?;
        Self::from_channels(channels, self.sample_rate)
    }

    /// Check buffer contains no NaN/Inf
    pub fn is_finite(&self) -> bool {
        self.samples.iter().flatten().all(|s| s.is_finite())
    }
}

// ============================================================================
// Audio Pair
// ============================================================================

/// An original buffer and its transformed counterpart
///
/// Both buffers share one sample rate; their lengths may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPair {
    original: AudioBuffer,
    transformed: AudioBuffer,
    sample_rate: u32,
}

impl AudioPair {
    /// Create a pair, checking that both buffers use `sample_rate`
    pub fn new(original: AudioBuffer, transformed: AudioBuffer, sample_rate: u32) -> Result<Self> {
        for buffer in [&original, &transformed] {
            if buffer.sample_rate() != sample_rate {
                return Err(DocsError::SampleRateMismatch {
                    expected: sample_rate,
                    actual: buffer.sample_rate(),
                });
            }
        }
        Ok(Self {
            original,
            transformed,
            sample_rate,
        })
    }

    /// The untouched buffer
    pub fn original(&self) -> &AudioBuffer {
        &self.original
    }

    /// The buffer after the transform
    pub fn transformed(&self) -> &AudioBuffer {
        &self.transformed
    }

    /// Shared sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
