//! Progressive web app plugin for fob builds
//!
//! Adds favicons and app icons, a web app manifest, a precaching service
//! worker and its registration script to a build's output, and injects the
//! matching tags into every generated HTML document.
//!
//! ## Architecture
//!
//! ```text
//! options + package.json + output config → resolve() → PwaBuild
//!                                                         ↓
//! make         icons/* + manifest.json  ∥  service-worker-registration.js
//!                                                         ↓
//! compilation  host HTML → </head> favicon tags, </body> registration script
//!                                                         ↓
//! after-emit   emitted files → service-worker.js
//! ```
//!
//! Icon rendering and service worker generation sit behind the
//! [`IconGenerator`] and [`ManifestGenerator`] traits. [`RasterIconGenerator`]
//! and [`PrecacheGenerator`] are used unless others are supplied.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_pwa::{FobPwaPlugin, OutputOptions, PwaOptions, StaticDirHost};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let host = StaticDirHost::new(".", OutputOptions::new("dist"));
//! let plugin = FobPwaPlugin::new(PwaOptions::new().with_favicon_image("assets/logo.png"));
//!
//! let report = plugin.run(&host).await?;
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod fs;
mod generator;
mod host;
mod html;
mod icons;
mod plugin;
mod registration;
mod service_worker;
mod writer;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
pub mod logging;

pub use config::{
    derived_service_worker_config, resolve_config, FaviconConfig, IconTargets, OutputOptions,
    OutputPaths, ProjectMetadata, PwaConfig, PwaOptions, ServiceWorkerConfig, ICONS_PATH,
};
pub use error::{GeneratorError, PwaError, PwaResult};
pub use fs::{FsError, FsResult, MemoryFileSystem, NativeFileSystem, OutputFileSystem};
pub use generator::{
    IconFile, IconGenerator, IconImage, IconSet, ManifestGenerator, PrecacheGenerator,
    RasterIconGenerator,
};
pub use host::{BuildHost, HostContext, HtmlHooks, HtmlPluginData, Phase, StaticDirHost};
pub use html::{inject_favicons, inject_script, script_tag, HtmlInjector};
pub use icons::{icon_files, process_snippet, process_snippets, IconOutput};
pub use plugin::{BuildReport, FobPwaPlugin, MakeOutput, PwaBuild};
pub use registration::{build_registration_script, REGISTRATION_FILENAME, SERVICE_WORKER_FILENAME};
pub use writer::{write_output, EmittedFile, FileContents};

#[cfg(feature = "logging")]
pub use logging::{init_logging, init_logging_from_env, LogLevel};
