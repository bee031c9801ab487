//! Visualization
//!
//! Builds the before/after comparison figure: waveforms on the top row,
//! spectrograms on the bottom row, original on the left and transformed on
//! the right. Both columns share the amplitude limit and the spectrogram
//! colour scale so the panels compare directly.

mod colormap;
mod figure;
mod layout;

pub use colormap::magma;
pub use figure::{fonts_available, render, Figure};
pub use layout::{
    time_ticks, ColorScale, FigureSpec, SpectrogramPanel, WaveformPanel, INPUT_TITLE,
    TRANSFORMED_TITLE,
};

use tracing::debug;

use crate::engine::AudioPair;
use crate::error::Result;

/// Lay out and draw the comparison figure for `pair`
pub fn render_comparison(pair: &AudioPair) -> Result<Figure> {
    let spec = FigureSpec::compute(pair)?;
    debug!(
        ylim = spec.ylim,
        vmin = spec.color_scale.vmin,
        vmax = spec.color_scale.vmax,
        "figure layout"
    );
    render(&spec)
}
