//! Error handling for the fob-pwa CLI.
//!
//! Commands return [`CliError`]. `main` converts it to a [`miette::Report`];
//! plugin errors keep their diagnostic code and help text on the way.

use fob_plugin_pwa::PwaError;
use miette::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or merged
    #[error("Configuration error: {message}\n\nHint: {hint}")]
    Config { message: String, hint: String },

    /// Output directory does not exist
    #[error("Output directory not found: {}\n\nHint: Build the site first or pass the output directory as DIR", .0.display())]
    OutputNotFound(PathBuf),

    /// The plugin aborted the run
    #[error(transparent)]
    Pwa(#[from] PwaError),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn config(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
            hint: hint.into(),
        }
    }
}

/// Convert a CLI error to a miette report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Pwa(e) => Report::new(e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_error_keeps_diagnostic() {
        let report = cli_error_to_miette(CliError::Pwa(PwaError::MissingFaviconImage));
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("fob::pwa::missing_favicon_image"));
    }

    #[test]
    fn test_config_error_message() {
        let err = CliError::config("bad value", "Check pwa.config.json");
        assert_eq!(
            err.to_string(),
            "Configuration error: bad value\n\nHint: Check pwa.config.json"
        );
    }

    #[test]
    fn test_plugin_error_is_transparent() {
        let err = CliError::from(PwaError::MissingFaviconImage);
        assert_eq!(
            err.to_string(),
            "Path to image file is required in options.faviconImage"
        );
    }
}
