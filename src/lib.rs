//! waveform-docs - Documentation artifacts for audio transforms
//!
//! For one named transform, generates a deterministic original/transformed
//! audio pair, draws a comparison figure (aligned waveforms and
//! spectrograms) and writes the figure and both buffers to the
//! documentation directory.
//!
//! # Architecture
//!
//! The pipeline runs leaf-first:
//! - `registry`: transform identifier to recipe lookup
//! - `recipes`: seeded example generation
//! - `render`: figure layout and drawing
//! - `export`: lossless image and audio output
//! - `driver`: runs the stages in order for one identifier

pub mod cli;
pub mod config;
pub mod driver;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod export;
pub mod recipes;
pub mod registry;
pub mod render;
pub mod transforms;

pub use config::{DocsConfig, ReferenceAssets};
pub use driver::{Driver, DriverState};
pub use engine::{AudioBuffer, AudioPair};
pub use error::{DocsError, Result};
pub use export::{ArtifactExporter, ExportReport};
pub use registry::{ExampleDescriptor, ExampleRegistry};
pub use transforms::{RandomSources, Transform};
