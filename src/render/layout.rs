//! Figure layout
//!
//! Everything the comparison figure needs that can be decided without
//! drawing: shared amplitude limit, column widths, spectrogram arrays, the
//! shared colour scale and time-axis ticks. Computed fresh for every render.

use crate::config::{AMPLITUDE_HEADROOM, MAX_TIME_TICKS, SPECTROGRAM_RANGE_DB};
use crate::dsp::stft::{max_value, Spectrogram};
use crate::engine::{AudioBuffer, AudioPair};
use crate::error::{DocsError, Result};

pub const INPUT_TITLE: &str = "Input sound";
pub const TRANSFORMED_TITLE: &str = "Transformed sound";

/// Colour range shared by both spectrogram panels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub vmin: f32,
    pub vmax: f32,
}

impl ColorScale {
    /// Position of `db` within the scale, clamped to `0..=1`
    pub fn normalize(&self, db: f32) -> f32 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 {
            return 0.0;
        }
        ((db - self.vmin) / span).clamp(0.0, 1.0)
    }
}

/// Top-row panel: amplitude over time
#[derive(Debug, Clone)]
pub struct WaveformPanel {
    pub title: &'static str,
    /// Mono mix of the signal
    pub samples: Vec<f32>,
    pub duration_secs: f64,
    /// Drawn amplitude range, identical for both columns
    pub y_range: (f32, f32),
    pub time_ticks: Vec<f64>,
    pub show_y_axis: bool,
    pub show_x_ticks: bool,
}

/// Bottom-row panel: dB magnitude over time and frequency
#[derive(Debug, Clone)]
pub struct SpectrogramPanel {
    /// dB values indexed `[frame][bin]`
    pub db: Vec<Vec<f32>>,
    pub hop_secs: f64,
    pub bin_width_hz: f64,
    pub duration_secs: f64,
    pub time_ticks: Vec<f64>,
    pub show_y_axis: bool,
}

/// Derived description of one comparison figure
#[derive(Debug, Clone)]
pub struct FigureSpec {
    /// 1.1 x the larger peak of the two signals (0 for a silent pair)
    pub ylim: f32,
    /// Relative column widths, proportional to each signal's length
    pub width_ratios: [f64; 2],
    /// Longer of the two sample counts
    pub max_samples: usize,
    pub sample_rate: u32,
    pub waveforms: [WaveformPanel; 2],
    pub spectrograms: [SpectrogramPanel; 2],
    pub color_scale: ColorScale,
    /// Upper bound of both frequency axes
    pub freq_max: f64,
}

impl FigureSpec {
    /// Derive the layout for `pair`
    ///
    /// # Errors
    /// * `EmptyAudio` - If either signal has no samples
    pub fn compute(pair: &AudioPair) -> Result<Self> {
        let (original, transformed) = (pair.original(), pair.transformed());
        if original.is_empty() || transformed.is_empty() {
            return Err(DocsError::EmptyAudio);
        }
        let sample_rate = pair.sample_rate();

        let ylim = AMPLITUDE_HEADROOM * original.peak().max(transformed.peak());
        let y_range = if ylim > 0.0 { (-ylim, ylim) } else { (-1.0, 1.0) };

        let max_samples = original.num_samples().max(transformed.num_samples());
        let width_ratios = [
            original.num_samples() as f64 / max_samples as f64,
            transformed.num_samples() as f64 / max_samples as f64,
        ];

        let spectrograms = [original, transformed].map(|buffer| {
            let mono = buffer.to_mono();
            let spectrogram = Spectrogram::compute(&mono, sample_rate);
            SpectrogramPanel {
                db: spectrogram.to_db(),
                hop_secs: spectrogram.hop_secs(),
                bin_width_hz: spectrogram.bin_width_hz(),
                duration_secs: buffer.duration_secs(),
                time_ticks: time_ticks(buffer.duration_secs(), MAX_TIME_TICKS),
                show_y_axis: true,
            }
        });
        let vmax = max_value(&spectrograms[0].db).max(max_value(&spectrograms[1].db));
        let color_scale = ColorScale {
            vmin: vmax - SPECTROGRAM_RANGE_DB,
            vmax,
        };

        let waveform = |buffer: &AudioBuffer, title: &'static str| WaveformPanel {
            title,
            samples: buffer.to_mono(),
            duration_secs: buffer.duration_secs(),
            y_range,
            time_ticks: time_ticks(buffer.duration_secs(), MAX_TIME_TICKS),
            show_y_axis: true,
            show_x_ticks: false,
        };
        let mut waveforms = [
            waveform(original, INPUT_TITLE),
            waveform(transformed, TRANSFORMED_TITLE),
        ];
        let mut spectrograms = spectrograms;

        // Right column shares the left column's axes
        waveforms[1].show_y_axis = false;
        spectrograms[1].show_y_axis = false;

        Ok(Self {
            ylim,
            width_ratios,
            max_samples,
            sample_rate,
            waveforms,
            spectrograms,
            color_scale,
            freq_max: sample_rate as f64 / 2.0,
        })
    }
}

/// Tick positions from 0 to `duration` on a 1-2-2.5-5 x 10^k grid, at most
/// `max_ticks` of them
pub fn time_ticks(duration: f64, max_ticks: usize) -> Vec<f64> {
    if !(duration > 0.0) || max_ticks < 2 {
        return vec![0.0];
    }

    let rough = duration / (max_ticks - 1) as f64;
    let mut base = 10f64.powf(rough.log10().floor());
    let step = loop {
        let found = [1.0, 2.0, 2.5, 5.0]
            .iter()
            .map(|m| m * base)
            .find(|&step| (duration / step).floor() as usize + 1 <= max_ticks);
        match found {
            Some(step) => break step,
            None => base *= 10.0,
        }
    };

    let count = (duration / step).floor() as usize;
    (0..=count).map(|k| k as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generate_test_tone;
    use approx::assert_relative_eq;

    fn pair(original: AudioBuffer, transformed: AudioBuffer) -> AudioPair {
        AudioPair::new(original, transformed, 16000).unwrap()
    }

    fn scaled_tone(seconds: f32, gain: f32) -> AudioBuffer {
        let tone = generate_test_tone(440.0, seconds, 16000);
        AudioBuffer::from_mono(tone.channel(0).iter().map(|s| s * gain).collect(), 16000)
    }

    #[test]
    fn test_ylim_uses_the_louder_signal() {
        let spec = FigureSpec::compute(&pair(scaled_tone(1.0, 0.5), scaled_tone(1.0, 0.8))).unwrap();
        assert_relative_eq!(spec.ylim, 1.1 * 0.8, epsilon = 1e-3);
        assert_eq!(spec.waveforms[0].y_range, spec.waveforms[1].y_range);
        assert_eq!(spec.waveforms[0].y_range, (-spec.ylim, spec.ylim));
    }

    #[test]
    fn test_silent_pair_falls_back_to_unit_range() {
        let silent = AudioBuffer::new(1, 8000, 16000);
        let spec = FigureSpec::compute(&pair(silent.clone(), silent)).unwrap();
        assert_eq!(spec.ylim, 0.0);
        assert_eq!(spec.waveforms[0].y_range, (-1.0, 1.0));
    }

    #[test]
    fn test_color_scale_is_shared() {
        let spec = FigureSpec::compute(&pair(scaled_tone(1.0, 0.5), scaled_tone(0.5, 0.1))).unwrap();
        let scale = spec.color_scale;
        assert_relative_eq!(scale.vmax - scale.vmin, 85.0);
        let peak = max_value(&spec.spectrograms[0].db).max(max_value(&spec.spectrograms[1].db));
        assert_eq!(scale.vmax, peak);
    }

    #[test]
    fn test_widths_follow_lengths() {
        let spec = FigureSpec::compute(&pair(scaled_tone(2.0, 0.5), scaled_tone(1.0, 0.5))).unwrap();
        assert_eq!(spec.max_samples, 32000);
        assert_relative_eq!(spec.width_ratios[0], 1.0);
        assert_relative_eq!(spec.width_ratios[1], 0.5);
        assert_relative_eq!(spec.waveforms[1].duration_secs, 1.0);
    }

    #[test]
    fn test_axis_visibility() {
        let spec = FigureSpec::compute(&pair(scaled_tone(1.0, 0.5), scaled_tone(1.0, 0.5))).unwrap();
        assert!(spec.waveforms[0].show_y_axis);
        assert!(!spec.waveforms[1].show_y_axis);
        assert!(!spec.spectrograms[1].show_y_axis);
        assert!(spec.waveforms.iter().all(|w| !w.show_x_ticks));
        assert_eq!(spec.freq_max, 8000.0);
        assert_eq!(spec.waveforms[0].title, "Input sound");
    }

    #[test]
    fn test_empty_signal_is_rejected() {
        let empty = AudioBuffer::from_mono(Vec::new(), 16000);
        let result = FigureSpec::compute(&pair(scaled_tone(1.0, 0.5), empty));
        assert!(matches!(result, Err(DocsError::EmptyAudio)));
    }

    #[test]
    fn test_time_ticks() {
        assert_eq!(time_ticks(4.7, 5), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(time_ticks(12.0, 5), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(time_ticks(4.0, 5), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(time_ticks(0.0, 5), vec![0.0]);
        for duration in [0.03, 0.9, 1.7, 3.76, 4.7, 12.0, 95.0] {
            let ticks = time_ticks(duration, 5);
            assert!(ticks.len() <= 5 && ticks.len() >= 2, "{}: {:?}", duration, ticks);
            assert!(*ticks.last().unwrap() <= duration + 1e-9);
        }
    }
}
