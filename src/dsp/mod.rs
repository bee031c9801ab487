//! DSP Building Blocks
//!
//! Filters, reverberation and spectral analysis shared by the transforms
//! and the figure renderer.

mod biquad;
mod reverb;
pub mod stft;

pub use biquad::{Biquad, BiquadCoeffs, FilterType};
pub use reverb::Freeverb;
pub use stft::Spectrogram;
