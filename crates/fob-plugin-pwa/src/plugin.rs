//! Plugin controller and phase scheduler

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{resolve_config, OutputPaths, ProjectMetadata, PwaConfig, PwaOptions};
use crate::error::{PwaError, PwaResult};
use crate::fs::OutputFileSystem;
use crate::generator::{IconGenerator, ManifestGenerator, PrecacheGenerator, RasterIconGenerator};
use crate::host::{BuildHost, HostContext, HtmlHooks, Phase};
use crate::html::{script_tag, HtmlInjector};
use crate::icons::make_icons;
use crate::registration::{write_registration, REGISTRATION_FILENAME};
use crate::service_worker::write_service_worker;

/// Progressive web app plugin
///
/// Resolves its options against the host, then drives three phases:
///
/// 1. `make`: icons and the registration script are written concurrently
/// 2. `compilation`: the host compiles with the HTML injector attached
/// 3. `after-emit`: the service worker is generated from the final output
///
/// Each phase starts once the previous one has settled. The first error aborts
/// the run; files already written are left in place.
#[derive(Debug, Clone)]
pub struct FobPwaPlugin {
    options: PwaOptions,
    icon_generator: Arc<dyn IconGenerator>,
    manifest_generator: Arc<dyn ManifestGenerator>,
}

impl Default for FobPwaPlugin {
    fn default() -> Self {
        Self::new(PwaOptions::default())
    }
}

impl FobPwaPlugin {
    /// Create a plugin using the built-in generators
    pub fn new(options: PwaOptions) -> Self {
        Self {
            options,
            icon_generator: Arc::new(RasterIconGenerator::new()),
            manifest_generator: Arc::new(PrecacheGenerator::new()),
        }
    }

    pub fn with_icon_generator(mut self, generator: Arc<dyn IconGenerator>) -> Self {
        self.icon_generator = generator;
        self
    }

    pub fn with_manifest_generator(mut self, generator: Arc<dyn ManifestGenerator>) -> Self {
        self.manifest_generator = generator;
        self
    }

    pub fn options(&self) -> &PwaOptions {
        &self.options
    }

    /// Resolve the options against `host` into the context shared by every phase
    pub fn resolve(&self, host: &HostContext) -> PwaResult<PwaBuild> {
        let mut output = host.output.clone();
        if output.path.is_relative() {
            output.path = host.context.join(&output.path);
        }
        let paths = OutputPaths::resolve(&output);
        let metadata = ProjectMetadata::discover(&host.context);
        let mut config = resolve_config(&metadata, &paths, &self.options)?;

        if let Some(image) = &config.favicon_image {
            if image.is_relative() {
                config.favicon_image = Some(host.context.join(image));
            }
        }

        debug!(
            "resolved pwa config: favicon={}, service_worker={}, inject={}",
            config.should_create_favicon,
            config.should_create_service_worker,
            config.inject_html_tags
        );

        Ok(PwaBuild {
            config,
            paths,
            fs: Arc::clone(&host.fs),
            icon_generator: Arc::clone(&self.icon_generator),
            manifest_generator: Arc::clone(&self.manifest_generator),
        })
    }

    /// Run every phase against `host`
    pub async fn run(&self, host: &dyn BuildHost) -> PwaResult<BuildReport> {
        let build = self.resolve(&host.context())?;
        build.validate()?;

        let make = make(&build).await?;
        info!("{} phase finished ({} files)", Phase::Make, make.written.len());

        let injector = build.html_injector(&make);
        let hooks = injector.as_ref().map(|injector| injector as &dyn HtmlHooks);
        host.compile(hooks).await?;
        info!("{} phase finished", Phase::Compilation);

        let mut written = make.written;
        if build.config.should_create_service_worker {
            written.push(write_service_worker(&build).await?);
        }
        info!("{} phase finished", Phase::AfterEmit);

        Ok(BuildReport {
            written,
            favicon_html: make.favicon_html,
        })
    }
}

/// Everything one build needs, resolved once and shared read-only by every phase
#[derive(Debug, Clone)]
pub struct PwaBuild {
    pub config: PwaConfig,
    pub paths: OutputPaths,
    fs: Arc<dyn OutputFileSystem>,
    icon_generator: Arc<dyn IconGenerator>,
    manifest_generator: Arc<dyn ManifestGenerator>,
}

impl PwaBuild {
    pub fn fs(&self) -> &dyn OutputFileSystem {
        self.fs.as_ref()
    }

    pub fn icon_generator(&self) -> &dyn IconGenerator {
        self.icon_generator.as_ref()
    }

    pub fn manifest_generator(&self) -> &dyn ManifestGenerator {
        self.manifest_generator.as_ref()
    }

    /// Check required options before any phase starts
    pub fn validate(&self) -> PwaResult<()> {
        if self.config.should_create_favicon && self.config.favicon_image.is_none() {
            return Err(PwaError::MissingFaviconImage);
        }
        Ok(())
    }

    fn html_injector(&self, make: &MakeOutput) -> Option<HtmlInjector> {
        if !self.config.inject_html_tags {
            return None;
        }
        let script = self
            .config
            .should_create_service_worker
            .then(|| script_tag(&self.paths.public_path, REGISTRATION_FILENAME));
        Some(HtmlInjector::new(make.favicon_html.clone(), script))
    }
}

/// Output of the make phase, handed to the later phases
#[derive(Debug, Clone, Default)]
pub struct MakeOutput {
    /// Post-processed favicon tags awaiting injection
    pub favicon_html: Vec<String>,
    pub written: Vec<PathBuf>,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Every file the plugin wrote, in completion order
    pub written: Vec<PathBuf>,
    pub favicon_html: Vec<String>,
}

async fn make(build: &PwaBuild) -> PwaResult<MakeOutput> {
    let icons = async {
        if build.config.should_create_favicon {
            make_icons(build).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let registration = async {
        if build.config.should_create_service_worker {
            write_registration(build).await.map(Some)
        } else {
            Ok(None)
        }
    };

    let (icons, registration) = futures::try_join!(icons, registration)?;

    let mut output = MakeOutput::default();
    if let Some(icons) = icons {
        output.favicon_html = icons.html;
        output.written = icons.written;
    }
    output.written.extend(registration);
    Ok(output)
}
