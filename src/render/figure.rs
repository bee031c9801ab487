//! Comparison figure rendering
//!
//! Draws the four panels of a `FigureSpec` into an in-memory RGB bitmap
//! with plotters. Labels need a font; one is loaded from the usual system
//! locations the first time a figure is rendered, and without one the
//! panels are drawn bare.

use std::ops::Range;
use std::sync::OnceLock;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use tracing::{debug, warn};

use super::colormap::magma;
use super::layout::{FigureSpec, SpectrogramPanel, WaveformPanel};
use crate::config::{figure_size_pixels, MAX_TIME_TICKS};
use crate::error::{DocsError, Result};

const FONT_FAMILY: &str = "sans-serif";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const WAVE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Spectrogram bins are merged so a panel holds at most this many rows
const MAX_SPECTROGRAM_ROWS: usize = 256;

const PANEL_MARGIN: i32 = 8;
const TITLE_SIZE: f64 = 22.0;
const LABEL_SIZE: f64 = 16.0;
const X_LABEL_AREA: i32 = 36;
const Y_LABEL_AREA: i32 = 64;

/// A rendered figure: packed 8-bit RGB, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    rgb: Vec<u8>,
    width: u32,
    height: u32,
}

impl Figure {
    /// Wrap an existing RGB bitmap
    pub fn from_rgb(rgb: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(DocsError::render(format!(
                "bitmap holds {} bytes, {}x{} RGB needs {}",
                rgb.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self { rgb, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn into_rgb(self) -> Vec<u8> {
        self.rgb
    }
}

/// Time axis whose labelled points are the layout's precomputed ticks
struct TimeAxis {
    range: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TimeAxis {
    fn new(duration_secs: f64, ticks: &[f64]) -> Self {
        Self {
            range: (0.0..duration_secs).into(),
            ticks: ticks.to_vec(),
        }
    }
}

impl Ranged for TimeAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.range.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.ticks
            .iter()
            .copied()
            .take(hint.max_num_points())
            .collect()
    }

    fn range(&self) -> Range<f64> {
        self.range.range()
    }
}

/// Whether text can be drawn; registers a system font on first call
pub fn fonts_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let loaded = FONT_CANDIDATES.iter().find_map(|path| {
            let bytes = std::fs::read(path).ok()?;
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            register_font(FONT_FAMILY, FontStyle::Normal, bytes)
                .ok()
                .map(|_| *path)
        });
        match loaded {
            Some(path) => {
                debug!("figure font: {}", path);
                true
            }
            None => {
                warn!("no usable system font found; figure text will be omitted");
                false
            }
        }
    })
}

/// Render the comparison figure described by `spec`
pub fn render(spec: &FigureSpec) -> Result<Figure> {
    let (width, height) = figure_size_pixels();
    let mut rgb = vec![0u8; (width * height * 3) as usize];
    let with_text = fonts_available();

    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(DocsError::render)?;

        let (top, bottom) = root.split_vertically((height / 2) as i32);
        let split = column_split(width, spec.width_ratios, with_text) as i32;
        let (top_left, top_right) = top.split_horizontally(split);
        let (bottom_left, bottom_right) = bottom.split_horizontally(split);

        draw_waveform(&top_left, &spec.waveforms[0], with_text)?;
        draw_waveform(&top_right, &spec.waveforms[1], with_text)?;
        draw_spectrogram(&bottom_left, &spec.spectrograms[0], spec, with_text)?;
        draw_spectrogram(&bottom_right, &spec.spectrograms[1], spec, with_text)?;

        root.present().map_err(DocsError::render)?;
    }

    Ok(Figure { rgb, width, height })
}

/// Left column width in pixels
///
/// The left column also carries the shared y-axis gutter, so the gutter and
/// both columns' margins are set aside first and only the remaining plot
/// width is divided by `ratios`. Each plot area keeps at least one pixel.
fn column_split(width: u32, ratios: [f64; 2], with_text: bool) -> u32 {
    let gutter = if with_text { Y_LABEL_AREA as u32 } else { 0 };
    let margins = 4 * PANEL_MARGIN as u32;
    let plot_width = width.saturating_sub(gutter + margins).max(2);
    let total = ratios[0] + ratios[1];
    let left_plot = (plot_width as f64 * ratios[0] / total).round() as u32;
    gutter + 2 * PANEL_MARGIN as u32 + left_plot.clamp(1, plot_width - 1)
}

/// Min/max envelope with two points per pixel column
fn envelope(samples: &[f32], duration: f64, columns: usize) -> Vec<(f64, f64)> {
    if samples.is_empty() || columns == 0 {
        return Vec::new();
    }
    let per_column = samples.len().div_ceil(columns).max(1);
    let seconds_per_sample = duration / samples.len() as f64;

    samples
        .chunks(per_column)
        .enumerate()
        .flat_map(|(i, chunk)| {
            let t = (i * per_column) as f64 * seconds_per_sample;
            let lo = chunk.iter().copied().fold(f32::INFINITY, f32::min);
            let hi = chunk.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            [(t, lo as f64), (t, hi as f64)]
        })
        .collect()
}

fn draw_waveform<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &WaveformPanel,
    with_text: bool,
) -> Result<()> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(PANEL_MARGIN);
    if with_text {
        builder
            .caption(panel.title, (FONT_FAMILY, TITLE_SIZE))
            .x_label_area_size(if panel.show_x_ticks { X_LABEL_AREA } else { 0 })
            .y_label_area_size(if panel.show_y_axis { Y_LABEL_AREA } else { 0 });
    }

    let (y_min, y_max) = panel.y_range;
    let mut chart = builder
        .build_cartesian_2d(
            TimeAxis::new(panel.duration_secs, &panel.time_ticks),
            y_min as f64..y_max as f64,
        )
        .map_err(DocsError::render)?;

    if with_text {
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(MAX_TIME_TICKS)
            .y_labels(5)
            .x_label_formatter(&|t| format!("{}", t))
            .y_label_formatter(&|a| format!("{:.2}", a))
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .draw()
            .map_err(DocsError::render)?;
    }

    let columns = chart.plotting_area().dim_in_pixel().0 as usize;
    chart
        .draw_series(LineSeries::new(
            envelope(&panel.samples, panel.duration_secs, columns),
            &WAVE_COLOR,
        ))
        .map_err(DocsError::render)?;
    Ok(())
}

fn draw_spectrogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &SpectrogramPanel,
    spec: &FigureSpec,
    with_text: bool,
) -> Result<()> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(PANEL_MARGIN);
    if with_text {
        builder
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(if panel.show_y_axis { Y_LABEL_AREA } else { 0 });
    }

    let mut chart = builder
        .build_cartesian_2d(
            TimeAxis::new(panel.duration_secs, &panel.time_ticks),
            0.0..spec.freq_max,
        )
        .map_err(DocsError::render)?;

    let num_bins = panel.db.first().map_or(0, Vec::len);
    let group = num_bins.div_ceil(MAX_SPECTROGRAM_ROWS).max(1);
    let half_hop = panel.hop_secs / 2.0;

    let cells = panel.db.iter().enumerate().flat_map(|(frame, bins)| {
        let centre = frame as f64 * panel.hop_secs;
        let t0 = (centre - half_hop).max(0.0);
        let t1 = (centre + half_hop).min(panel.duration_secs);
        bins.chunks(group).enumerate().map(move |(row, chunk)| {
            let f0 = (row * group) as f64 * panel.bin_width_hz;
            let f1 = (f0 + chunk.len() as f64 * panel.bin_width_hz).min(spec.freq_max);
            let db = chunk.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let color = magma(spec.color_scale.normalize(db));
            Rectangle::new([(t0, f0), (t1, f1)], color.filled())
        })
    });
    chart.draw_series(cells).map_err(DocsError::render)?;

    if with_text {
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(MAX_TIME_TICKS)
            .y_labels(5)
            .x_desc("Time [s]")
            .y_desc(if panel.show_y_axis { "Hz" } else { "" })
            .x_label_formatter(&|t| format!("{}", t))
            .y_label_formatter(&|f| format!("{:.0}", f))
            .label_style((FONT_FAMILY, LABEL_SIZE))
            .draw()
            .map_err(DocsError::render)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{generate_test_tone, AudioBuffer, AudioPair};

    #[test]
    fn test_column_split() {
        assert_eq!(column_split(1280, [1.0, 1.0], false), 640);
        assert_eq!(column_split(1280, [1.0, 0.5], false), 848);
        assert_eq!(column_split(1280, [1.0, 1.0], true), 672);
        // Right plot area never collapses to zero
        assert!(column_split(1280, [1.0, 1e-9], false) < 1280 - 2 * PANEL_MARGIN as u32);
    }

    #[test]
    fn test_time_axis_uses_layout_ticks() {
        let axis = TimeAxis::new(4.7, &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(axis.key_points(MAX_TIME_TICKS), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(axis.key_points(2usize), vec![0.0, 1.0]);
        assert_eq!(axis.range(), 0.0..4.7);
        assert_eq!(axis.map(&0.0, (10, 110)), 10);
    }

    #[test]
    fn test_envelope_covers_extremes() {
        let samples = [0.0, 1.0, -1.0, 0.5, 0.25, -0.5];
        let points = envelope(&samples, 6.0, 3);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[1], (0.0, 1.0));
        assert_eq!(points[2], (2.0, -1.0));
    }

    #[test]
    fn test_render_produces_full_bitmap() {
        let tone = generate_test_tone(440.0, 0.5, 16000);
        let quiet = AudioBuffer::from_mono(tone.channel(0)[..4000].to_vec(), 16000);
        let pair = AudioPair::new(tone, quiet, 16000).unwrap();
        let spec = FigureSpec::compute(&pair).unwrap();

        let figure = render(&spec).unwrap();
        assert_eq!((figure.width(), figure.height()), (1280, 960));
        assert_eq!(figure.rgb().len(), 1280 * 960 * 3);
        assert!(figure.rgb().chunks(3).any(|px| px != [255, 255, 255]));
    }

    /// Horizontal extent of waveform pixels in the top row within `columns`
    fn wave_extent(figure: &Figure, columns: Range<u32>) -> u32 {
        let mut xs = Vec::new();
        for y in 0..figure.height() / 2 {
            for x in columns.clone() {
                let i = ((y * figure.width() + x) * 3) as usize;
                if figure.rgb()[i..i + 3] == [WAVE_COLOR.0, WAVE_COLOR.1, WAVE_COLOR.2] {
                    xs.push(x);
                }
            }
        }
        let min = xs.iter().copied().min().unwrap();
        let max = xs.iter().copied().max().unwrap();
        max - min + 1
    }

    fn rendered_plot_widths(original: AudioBuffer, transformed: AudioBuffer) -> (f64, f64) {
        let pair = AudioPair::new(original, transformed, 16000).unwrap();
        let spec = FigureSpec::compute(&pair).unwrap();
        let figure = render(&spec).unwrap();
        let split = column_split(figure.width(), spec.width_ratios, fonts_available());
        (
            wave_extent(&figure, 0..split) as f64,
            wave_extent(&figure, split..figure.width()) as f64,
        )
    }

    #[test]
    fn test_equal_lengths_draw_equal_plot_widths() {
        let tone = generate_test_tone(440.0, 1.0, 16000);
        let (left, right) = rendered_plot_widths(tone.clone(), tone);
        assert!((left - right).abs() <= 2.0, "left {} right {}", left, right);
    }

    #[test]
    fn test_plot_widths_follow_lengths() {
        let long = generate_test_tone(440.0, 2.0, 16000);
        let short = generate_test_tone(440.0, 1.0, 16000);
        let (left, right) = rendered_plot_widths(long, short);
        assert!((right / left - 0.5).abs() < 0.02, "left {} right {}", left, right);
    }
}
