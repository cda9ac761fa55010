//! Fob PWA CLI
//!
//! Runs `fob-plugin-pwa` against an output directory produced by any build
//! tool: icons, the web app manifest, the service worker and its
//! registration script are written next to the existing files, and every
//! HTML document is rewritten in place to reference them.
//!
//! - [`cli`] - clap argument definitions
//! - [`config`] - layered configuration (file, environment, flags)
//! - [`error`] - CLI errors and their miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status messages
//! - `commands` - `build` and `config`

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
