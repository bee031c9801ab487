//! Artifact export
//!
//! Writes one example's artifacts into the output directory:
//!
//! - `{id}.webp`: the comparison figure, lossless WebP
//! - `{id}_input.wav`: the original audio, 32-bit float
//! - `{id}_transformed.wav`: the transformed audio, 32-bit float
//!
//! Existing files are overwritten.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::{
    AUDIO_EXTENSION, IMAGE_EXTENSION, INPUT_SUFFIX, INTERMEDIATE_IMAGE_EXTENSION,
    TRANSFORMED_SUFFIX,
};
use crate::engine::{write_wav, AudioPair};
use crate::error::Result;
use crate::render::Figure;

/// Output locations for one example
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub image: PathBuf,
    pub input_audio: PathBuf,
    pub transformed_audio: PathBuf,
}

/// A written file and its SHA-256 digest (lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub sha256: String,
}

/// Everything written for one example
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub identifier: String,
    pub image: WrittenArtifact,
    pub input_audio: WrittenArtifact,
    pub transformed_audio: WrittenArtifact,
}

impl ExportReport {
    pub fn artifacts(&self) -> [&WrittenArtifact; 3] {
        [&self.image, &self.input_audio, &self.transformed_audio]
    }
}

/// Writes artifacts under a single output directory
#[derive(Debug, Clone)]
pub struct ArtifactExporter {
    output_dir: PathBuf,
}

impl ArtifactExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths the artifacts for `identifier` are written to
    pub fn artifact_paths(&self, identifier: &str) -> ArtifactPaths {
        let file = |suffix: &str, extension: &str| {
            self.output_dir
                .join(format!("{}{}.{}", identifier, suffix, extension))
        };
        ArtifactPaths {
            image: file("", IMAGE_EXTENSION),
            input_audio: file(INPUT_SUFFIX, AUDIO_EXTENSION),
            transformed_audio: file(TRANSFORMED_SUFFIX, AUDIO_EXTENSION),
        }
    }

    /// Save the figure as lossless WebP, going through a PNG next to it
    ///
    /// Consumes the figure. The PNG is removed once re-encoding has been
    /// attempted, whether or not it succeeded. A failed re-encode is
    /// reported ahead of a failed removal.
    pub fn export_figure(&self, figure: Figure, identifier: &str) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.artifact_paths(identifier).image;
        let intermediate = path.with_extension(INTERMEDIATE_IMAGE_EXTENSION);

        let (width, height) = (figure.width(), figure.height());
        image::save_buffer(
            &intermediate,
            &figure.into_rgb(),
            width,
            height,
            ExtendedColorType::Rgb8,
        )?;
        debug!("wrote {}", intermediate.display());

        let encoded = reencode_lossless(&intermediate, &path);
        let removed = fs::remove_file(&intermediate);
        if let Err(e) = encoded {
            if let Err(remove_err) = removed {
                warn!(
                    "could not remove {}: {}",
                    intermediate.display(),
                    remove_err
                );
            }
            return Err(e);
        }
        removed?;

        Ok(path)
    }

    /// Save both buffers of `pair` as float WAV files
    pub fn export_audio(&self, pair: &AudioPair, identifier: &str) -> Result<(PathBuf, PathBuf)> {
        self.ensure_output_dir()?;
        let paths = self.artifact_paths(identifier);
        write_wav(pair.original(), &paths.input_audio)?;
        write_wav(pair.transformed(), &paths.transformed_audio)?;
        Ok((paths.input_audio, paths.transformed_audio))
    }

    /// Write all three artifacts and checksum them
    pub fn export(&self, figure: Figure, pair: &AudioPair, identifier: &str) -> Result<ExportReport> {
        let image = self.export_figure(figure, identifier)?;
        let (input_audio, transformed_audio) = self.export_audio(pair, identifier)?;

        let report = ExportReport {
            identifier: identifier.to_string(),
            image: checksum(image)?,
            input_audio: checksum(input_audio)?,
            transformed_audio: checksum(transformed_audio)?,
        };
        for artifact in report.artifacts() {
            info!(sha256 = %artifact.sha256, "wrote {}", artifact.path.display());
        }
        Ok(report)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)?;
        }
        Ok(())
    }
}

fn reencode_lossless(source: &Path, destination: &Path) -> Result<()> {
    let raster = image::open(source)?.to_rgb8();
    let writer = BufWriter::new(File::create(destination)?);
    WebPEncoder::new_lossless(writer).encode(
        raster.as_raw(),
        raster.width(),
        raster.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

fn checksum(path: PathBuf) -> Result<WrittenArtifact> {
    let digest = Sha256::digest(fs::read(&path)?);
    Ok(WrittenArtifact {
        path,
        sha256: format!("{:x}", digest),
    })
}
