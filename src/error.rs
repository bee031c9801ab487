//! Error handling for waveform-docs
//!
//! Every failure is fatal for a run: the tool is a one-shot build step, so
//! errors carry enough context for the developer to fix the cause and re-run.

use thiserror::Error;

/// Result type alias for waveform-docs operations
pub type Result<T> = std::result::Result<T, DocsError>;

/// Broad classes of failure, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The requested transform is not registered
    Configuration,
    /// A reference asset or output path could not be read or written
    AssetIo,
    /// A transform failed while processing a buffer
    Transform,
    /// The comparison figure could not be drawn or encoded
    Render,
}

/// Main error type for waveform-docs operations
#[derive(Error, Debug)]
pub enum DocsError {
    // Configuration Errors
    #[error("Unknown transform '{name}' (available: {})", available.join(", "))]
    UnknownTransform {
        name: String,
        available: Vec<String>,
    },

    // Asset Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    #[error("Sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    // Transform Errors
    #[error("Transform '{transform}' failed: {reason}")]
    TransformFailed { transform: String, reason: String },

    #[error("Invalid parameter '{param}' = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Render Errors
    #[error("Figure rendering failed: {reason}")]
    Render { reason: String },

    #[error("Image encoding failed: {0}")]
    ImageEncoding(#[from] image::ImageError),

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl DocsError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DocsError::UnknownTransform { .. } => "UNKNOWN_TRANSFORM",
            DocsError::FileNotFound { .. } => "FILE_NOT_FOUND",
            DocsError::InvalidAudio { .. } => "INVALID_AUDIO",
            DocsError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            DocsError::EmptyAudio => "EMPTY_AUDIO",
            DocsError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            DocsError::TransformFailed { .. } => "TRANSFORM_FAILED",
            DocsError::InvalidParameter { .. } => "INVALID_PARAMETER",
            DocsError::Render { .. } => "RENDER_ERROR",
            DocsError::ImageEncoding(_) => "IMAGE_ENCODING_ERROR",
            DocsError::Io(_) => "IO_ERROR",
            DocsError::Wav(_) => "WAV_ERROR",
        }
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            DocsError::UnknownTransform { .. } => ErrorCategory::Configuration,
            DocsError::FileNotFound { .. }
            | DocsError::InvalidAudio { .. }
            | DocsError::UnsupportedFormat { .. }
            | DocsError::Io(_)
            | DocsError::Wav(_) => ErrorCategory::AssetIo,
            DocsError::EmptyAudio
            | DocsError::SampleRateMismatch { .. }
            | DocsError::TransformFailed { .. }
            | DocsError::InvalidParameter { .. } => ErrorCategory::Transform,
            DocsError::Render { .. } | DocsError::ImageEncoding(_) => ErrorCategory::Render,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DocsError::UnknownTransform { .. } => vec![
                "Check the spelling of the transform name",
                "Run with --help to list the registered transforms",
            ],
            DocsError::FileNotFound { .. } => vec![
                "Run 'cargo run --example generate_fixtures' to create the reference assets",
                "Check that the assets directory has not been moved",
            ],
            DocsError::InvalidAudio { .. } | DocsError::UnsupportedFormat { .. } => vec![
                "Reference assets must be PCM or float WAV files",
                "Re-generate the reference assets",
            ],
            DocsError::Io(_) => vec![
                "Check that the output directory is writable",
                "Free up disk space",
            ],
            _ => vec![],
        }
    }

    /// Build a transform failure for the named transform
    pub fn transform(transform: &str, reason: impl Into<String>) -> Self {
        DocsError::TransformFailed {
            transform: transform.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a render failure from any displayable drawing error
    pub fn render(err: impl std::fmt::Display) -> Self {
        DocsError::Render {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DocsError::FileNotFound {
            path: "libri1.wav".to_string(),
            source: None,
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
        assert_eq!(err.category(), ErrorCategory::AssetIo);
    }

    #[test]
    fn test_unknown_transform_lists_available() {
        let err = DocsError::UnknownTransform {
            name: "Reverse".to_string(),
            available: vec!["Shift".to_string(), "Trim".to_string()],
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err.to_string(),
            "Unknown transform 'Reverse' (available: Shift, Trim)"
        );
        assert!(!err.recovery_suggestions().is_empty());
    }

    #[test]
    fn test_transform_helper() {
        let err = DocsError::transform("Trim", "boom");
        assert_eq!(err.error_code(), "TRANSFORM_FAILED");
        assert_eq!(err.category(), ErrorCategory::Transform);
    }
}
