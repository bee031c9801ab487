//! Short-time Fourier transform
//!
//! Magnitude spectrograms for the comparison figure. Frames are centred on
//! multiples of the hop length, with zero padding at both ends, and
//! weighted by a periodic Hann window.

use rustfft::{num_complex::Complex, FftPlanner};

/// FFT size used for spectrograms
pub const DEFAULT_N_FFT: usize = 2048;

/// Hop between successive frames
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// Smallest amplitude considered when converting to dB
pub const AMPLITUDE_FLOOR: f32 = 1e-5;

/// Values further than this below the peak are clipped
pub const TOP_DB: f32 = 80.0;

/// Magnitude spectrogram, indexed `[frame][bin]`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    magnitudes: Vec<Vec<f32>>,
    n_fft: usize,
    hop_length: usize,
    sample_rate: u32,
}

impl Spectrogram {
    /// Compute with the default FFT size and hop
    pub fn compute(samples: &[f32], sample_rate: u32) -> Self {
        Self::with_params(samples, sample_rate, DEFAULT_N_FFT, DEFAULT_HOP_LENGTH)
    }

    /// Compute with explicit FFT size and hop length
    pub fn with_params(samples: &[f32], sample_rate: u32, n_fft: usize, hop_length: usize) -> Self {
        let pad = n_fft / 2;
        let mut padded = vec![0.0_f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let num_frames = 1 + (padded.len() - n_fft) / hop_length;
        let window = hann_window(n_fft);

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let mut scratch = vec![Complex::new(0.0, 0.0); n_fft];

        let magnitudes = (0..num_frames)
            .map(|frame| {
                let start = frame * hop_length;
                for (i, slot) in scratch.iter_mut().enumerate() {
                    *slot = Complex::new(padded[start + i] * window[i], 0.0);
                }
                fft.process(&mut scratch);
                scratch[..=n_fft / 2].iter().map(|c| c.norm()).collect()
            })
            .collect();

        Self {
            magnitudes,
            n_fft,
            hop_length,
            sample_rate,
        }
    }

    /// Number of time frames
    pub fn num_frames(&self) -> usize {
        self.magnitudes.len()
    }

    /// Number of frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Hop length in samples
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Width of one frequency bin in Hz
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate as f64 / self.n_fft as f64
    }

    /// Duration of one hop in seconds
    pub fn hop_secs(&self) -> f64 {
        self.hop_length as f64 / self.sample_rate as f64
    }

    /// Raw magnitudes
    pub fn magnitudes(&self) -> &[Vec<f32>] {
        &self.magnitudes
    }

    /// Magnitudes in dB relative to this spectrogram's own peak
    ///
    /// The peak maps to 0 dB and nothing falls below `-TOP_DB`.
    pub fn to_db(&self) -> Vec<Vec<f32>> {
        let reference = self
            .magnitudes
            .iter()
            .flatten()
            .copied()
            .fold(0.0_f32, f32::max)
            .max(AMPLITUDE_FLOOR);
        let ref_db = 20.0 * reference.log10();

        let db: Vec<Vec<f32>> = self
            .magnitudes
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|&m| 20.0 * m.max(AMPLITUDE_FLOOR).log10() - ref_db)
                    .collect()
            })
            .collect();

        let floor = max_value(&db) - TOP_DB;
        db.into_iter()
            .map(|frame| frame.into_iter().map(|v| v.max(floor)).collect())
            .collect()
    }
}

/// Largest value in a 2-D array (`-inf` when empty)
pub fn max_value(values: &[Vec<f32>]) -> f32 {
    values
        .iter()
        .flatten()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Periodic Hann window
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate_test_tone;

    #[test]
    fn test_frame_count_matches_centred_framing() {
        let samples = vec![0.0; 16000];
        let spec = Spectrogram::compute(&samples, 16000);
        assert_eq!(spec.num_frames(), 1 + 16000 / DEFAULT_HOP_LENGTH);
        assert_eq!(spec.num_bins(), DEFAULT_N_FFT / 2 + 1);
    }

    #[test]
    fn test_short_signal_still_has_a_frame() {
        let spec = Spectrogram::compute(&[0.5; 10], 16000);
        assert_eq!(spec.num_frames(), 1);
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let tone = generate_test_tone(1000.0, 1.0, 16000);
        let spec = Spectrogram::compute(tone.channel(0), 16000);
        let frame = &spec.magnitudes()[spec.num_frames() / 2];
        let (peak_bin, _) = frame
            .iter()
            .enumerate()
            .fold((0, 0.0_f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        let expected = (1000.0 / spec.bin_width_hz()).round() as usize;
        assert_eq!(peak_bin, expected);
    }

    #[test]
    fn test_db_is_referenced_to_own_peak() {
        let tone = generate_test_tone(440.0, 0.5, 16000);
        let db = Spectrogram::compute(tone.channel(0), 16000).to_db();
        assert!(max_value(&db).abs() < 1e-4);
        let min = db.iter().flatten().copied().fold(f32::INFINITY, f32::min);
        assert!(min >= -TOP_DB - 1e-3);
    }
}
