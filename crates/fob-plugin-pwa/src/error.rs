//! Error types for the PWA plugin

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs::FsError;

/// Result type for plugin operations
pub type PwaResult<T> = Result<T, PwaError>;

/// Errors that abort a build
#[derive(Error, Debug, Diagnostic)]
pub enum PwaError {
    /// Icon creation is enabled but no source image was configured
    #[error("Path to image file is required in options.faviconImage")]
    #[diagnostic(
        code(fob::pwa::missing_favicon_image),
        help("Set `faviconImage` or disable icons with `shouldCreateFavicon: false`")
    )]
    MissingFaviconImage,

    /// The icon generator reported a failure
    #[error("Icon generation failed: {0}")]
    #[diagnostic(code(fob::pwa::icon_generator))]
    IconGenerator(#[source] GeneratorError),

    /// The service worker manifest generator reported a failure
    #[error("Service worker generation failed: {0}")]
    #[diagnostic(code(fob::pwa::manifest_generator))]
    ManifestGenerator(#[source] GeneratorError),

    /// Output filesystem failure, passed through unchanged
    #[error(transparent)]
    #[diagnostic(code(fob::pwa::fs))]
    Fs(#[from] FsError),

    /// Options could not be merged into an effective configuration
    #[error("Invalid PWA configuration: {0}")]
    #[diagnostic(code(fob::pwa::config))]
    Config(String),

    /// The host build failed while emitting its own assets
    #[error("Host build failed: {0}")]
    #[diagnostic(code(fob::pwa::host))]
    Host(String),
}

/// Errors reported by icon and service worker generators
#[derive(Error, Debug, Diagnostic)]
pub enum GeneratorError {
    /// Source image could not be read
    #[error("Failed to read source image {}: {source}", .path.display())]
    #[diagnostic(
        code(fob::pwa::source_image),
        help("Check that `faviconImage` points at a readable PNG or JPEG file")
    )]
    SourceImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding, resizing or encoding failed
    #[error("Image processing failed: {0}")]
    #[diagnostic(code(fob::pwa::image))]
    Image(String),

    /// A static file glob did not compile
    #[error("Invalid file pattern '{pattern}': {message}")]
    #[diagnostic(code(fob::pwa::invalid_pattern))]
    InvalidPattern { pattern: String, message: String },

    /// Walking the output directory failed
    #[error("Failed to scan output files: {0}")]
    #[diagnostic(code(fob::pwa::walk))]
    Walk(String),

    /// A blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),

    /// Failure from a custom generator
    #[error("{0}")]
    Other(String),
}

impl GeneratorError {
    pub fn source_image(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceImage {
            path: path.into(),
            source,
        }
    }

    pub fn image(message: impl std::fmt::Display) -> Self {
        Self::Image(message.to_string())
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }
}
