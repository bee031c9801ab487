//! Configuration
//!
//! Design constants for example generation and figure layout, plus the
//! locations the pipeline reads from and writes to. None of these are
//! exposed on the command line.

use std::path::{Path, PathBuf};

// ============================================================================
// Generation constants
// ============================================================================

/// Seed applied to both random sources before a transform is built
pub const EXAMPLE_SEED: u64 = 345;

/// Sample rate every example is generated at
pub const EXAMPLE_SAMPLE_RATE: u32 = 16000;

/// Length of the example window cut from the reference clip
pub const EXAMPLE_DURATION_SECS: f64 = 4.7;

// ============================================================================
// Figure constants
// ============================================================================

/// Figure resolution in dots per inch
pub const FIGURE_DPI: u32 = 200;

/// Figure size in inches (width, height)
pub const FIGURE_SIZE_INCHES: (f64, f64) = (6.4, 4.8);

/// Dynamic range shown on the spectrogram panels
pub const SPECTROGRAM_RANGE_DB: f32 = 85.0;

/// Maximum number of major ticks on a time axis
pub const MAX_TIME_TICKS: usize = 5;

/// Headroom applied to the shared waveform amplitude limit
pub const AMPLITUDE_HEADROOM: f32 = 1.1;

// ============================================================================
// Artifact naming
// ============================================================================

/// Extension of the exported comparison figure
pub const IMAGE_EXTENSION: &str = "webp";

/// Extension of the intermediate raster written before re-encoding
pub const INTERMEDIATE_IMAGE_EXTENSION: &str = "png";

/// Extension of the exported audio files
pub const AUDIO_EXTENSION: &str = "wav";

/// Suffix of the exported original audio
pub const INPUT_SUFFIX: &str = "_input";

/// Suffix of the exported transformed audio
pub const TRANSFORMED_SUFFIX: &str = "_transformed";

/// Locations of the reference audio used by every recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAssets {
    /// Speech clip every example starts from
    pub speech: PathBuf,
    /// Background sound file, or a directory of them
    pub background_noise: PathBuf,
}

impl ReferenceAssets {
    /// Assets stored under `dir` using the standard file names
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            speech: dir.join("libri1.wav"),
            background_noise: dir.join("pistachio.wav"),
        }
    }
}

/// Everything the driver needs to know about where things live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Directory receiving all artifacts
    pub output_dir: PathBuf,
    /// Reference audio
    pub assets: ReferenceAssets,
}

impl DocsConfig {
    /// Create a configuration from explicit locations
    pub fn new(output_dir: impl Into<PathBuf>, assets: ReferenceAssets) -> Self {
        Self {
            output_dir: output_dir.into(),
            assets,
        }
    }

    /// The fixed locations used by the command-line tool, relative to the
    /// crate root
    pub fn fixed() -> Self {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        Self {
            output_dir: root.join("docs").join("waveform_transforms"),
            assets: ReferenceAssets::in_dir(&root.join("assets")),
        }
    }
}

/// Figure size in pixels at the configured DPI
pub fn figure_size_pixels() -> (u32, u32) {
    let (w, h) = FIGURE_SIZE_INCHES;
    (
        (w * FIGURE_DPI as f64).round() as u32,
        (h * FIGURE_DPI as f64).round() as u32,
    )
}
