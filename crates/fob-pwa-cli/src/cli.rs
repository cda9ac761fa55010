//! Command-line interface definition for fob-pwa.
//!
//! - `fob-pwa build [DIR]` - generate PWA assets into an output directory
//! - `fob-pwa config [DIR]` - print the effective plugin configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fob-pwa - progressive web app assets for a built site
#[derive(Parser, Debug)]
#[command(
    name = "fob-pwa",
    version,
    about = "Add favicons, a web app manifest and a service worker to a built site",
    long_about = "fob-pwa runs the fob PWA plugin against an existing output directory.\n\
                  It renders icons from a single source image, writes a web app manifest,\n\
                  a precaching service worker and its registration script, and injects\n\
                  the matching tags into every HTML document."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate PWA assets into an output directory
    ///
    /// Writes icons under DIR/icons, manifest.json, service-worker.js and
    /// service-worker-registration.js at the root of DIR, then rewrites every
    /// HTML file below DIR to reference them.
    Build(BuildArgs),

    /// Print the effective plugin configuration as JSON
    Config(ConfigArgs),
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct PwaArgs {
    /// Output directory of an existing build
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Path to the configuration file (default: pwa.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root used to find package.json and relative images
    #[arg(long, value_name = "DIR")]
    pub context: Option<PathBuf>,

    /// URL prefix the output is served from (default: /)
    #[arg(long, value_name = "URL")]
    pub public_path: Option<String>,

    /// Source image for icon generation
    #[arg(long, value_name = "FILE")]
    pub favicon_image: Option<PathBuf>,

    /// Skip icon generation
    #[arg(long)]
    pub no_favicon: bool,

    /// Skip the service worker and its registration script
    #[arg(long)]
    pub no_service_worker: bool,

    /// Leave HTML documents untouched
    #[arg(long)]
    pub no_inject: bool,
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub pwa: PwaArgs,

    /// Run every step against an in-memory filesystem and report what would be written
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub pwa: PwaArgs,
}
