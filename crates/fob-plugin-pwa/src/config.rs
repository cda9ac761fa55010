//! PWA plugin configuration
//!
//! User options are partial: every field is optional and anything left out
//! falls back to a derived or built-in value. [`resolve_config`] layers the
//! sources in a fixed order:
//!
//! ```text
//! built-in defaults → package.json name/description + output-derived values → user options
//! ```
//!
//! The favicon configuration is merged key by key, so `{"icons": {"windows": true}}`
//! only flips one target. The service worker configuration is replaced wholesale
//! when the user supplies one.

use figment::{providers::Serialized, Figment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PwaError, PwaResult};

/// Directory, relative to the output root, that receives generated icons
pub const ICONS_PATH: &str = "/icons";

/// Options accepted from the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PwaOptions {
    /// Generate favicons and app icons (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_create_favicon: Option<bool>,

    /// Generate the service worker and its registration script (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_create_service_worker: Option<bool>,

    /// Source image for icon generation. Required when icons are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_image: Option<PathBuf>,

    /// Partial icon generator configuration, merged over the defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_config: Option<Value>,

    /// Service worker generator configuration, replaces the derived default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_worker_config: Option<ServiceWorkerConfig>,

    /// Inject favicon tags and the registration script into generated HTML (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_html_tags: Option<bool>,

    /// Literal registration script written instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_script: Option<String>,
}

impl PwaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favicon(mut self, enabled: bool) -> Self {
        self.should_create_favicon = Some(enabled);
        self
    }

    pub fn with_service_worker(mut self, enabled: bool) -> Self {
        self.should_create_service_worker = Some(enabled);
        self
    }

    pub fn with_favicon_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.favicon_image = Some(path.into());
        self
    }

    pub fn with_favicon_config(mut self, config: Value) -> Self {
        self.favicon_config = Some(config);
        self
    }

    pub fn with_service_worker_config(mut self, config: ServiceWorkerConfig) -> Self {
        self.service_worker_config = Some(config);
        self
    }

    pub fn with_inject_html_tags(mut self, enabled: bool) -> Self {
        self.inject_html_tags = Some(enabled);
        self
    }

    pub fn with_registration_script(mut self, script: impl Into<String>) -> Self {
        self.registration_script = Some(script.into());
        self
    }
}

/// Effective configuration for one build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PwaConfig {
    pub should_create_favicon: bool,
    pub should_create_service_worker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_image: Option<PathBuf>,
    pub favicon_config: FaviconConfig,
    pub service_worker_config: ServiceWorkerConfig,
    pub inject_html_tags: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_script: Option<String>,
}

/// Icon generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaviconConfig {
    pub app_name: String,
    pub app_description: String,
    /// Background colour for flattened icons and the web app manifest
    pub background: String,
    #[serde(rename = "theme_color")]
    pub theme_color: String,
    /// URL path prefix for generated icons. Set by the icon pipeline.
    pub path: String,
    pub display: String,
    #[serde(rename = "start_url")]
    pub start_url: String,
    pub icons: IconTargets,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            app_name: "PWA App".to_string(),
            app_description: "PWA App made with fob-plugin-pwa".to_string(),
            background: "#ffffff".to_string(),
            theme_color: "#000000".to_string(),
            path: ICONS_PATH.to_string(),
            display: "standalone".to_string(),
            start_url: "/".to_string(),
            icons: IconTargets::default(),
        }
    }
}

/// Platforms to generate icons for
///
/// The defaults keep the asset count low: Android, Apple touch icon and plain
/// favicons only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconTargets {
    pub android: bool,
    pub apple_icon: bool,
    pub apple_startup: bool,
    pub coast: bool,
    pub favicons: bool,
    pub firefox: bool,
    pub windows: bool,
    pub yandex: bool,
}

impl Default for IconTargets {
    fn default() -> Self {
        Self {
            android: true,
            apple_icon: true,
            apple_startup: false,
            coast: false,
            favicons: true,
            firefox: false,
            windows: false,
            yandex: false,
        }
    }
}

/// Service worker generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerConfig {
    /// Globs selecting the files to precache
    #[serde(default)]
    pub static_file_globs: Vec<String>,

    /// Removed from the start of each matched file path to form its URL
    #[serde(default)]
    pub strip_prefix: String,

    /// Prepended to each URL after stripping
    #[serde(default)]
    pub replace_prefix: String,

    /// URL served for navigations that miss the cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_fallback: Option<String>,

    /// Cache name prefix (default: "fob-pwa")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_id: Option<String>,
}

/// Output configuration as the host reports it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

impl OutputOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            public_path: None,
        }
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = Some(public_path.into());
        self
    }
}

/// Resolved output directory and public URL prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub public_path: String,
}

impl OutputPaths {
    /// An unset or empty public path becomes `/`
    pub fn resolve(output: &OutputOptions) -> Self {
        let public_path = match output.public_path.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => "/".to_string(),
        };
        Self {
            dir: output.path.clone(),
            public_path,
        }
    }

    /// Directory that receives generated icons
    pub fn icons_dir(&self) -> PathBuf {
        self.dir.join(ICONS_PATH.trim_start_matches('/'))
    }
}

/// `name` and `description` from the project's package.json
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ProjectMetadata {
    /// Read `package.json` from `context`, falling back to its parent.
    ///
    /// A missing file yields empty metadata. An unreadable or malformed file is
    /// logged and also yields empty metadata.
    pub fn discover(context: &Path) -> Self {
        let candidates = [
            context.join("package.json"),
            context.join("..").join("package.json"),
        ];
        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            debug!("no package.json found from {}", context.display());
            return Self::default();
        };

        match Self::read(path) {
            Ok(metadata) => metadata,
            Err(message) => {
                warn!("ignoring {}: {}", path.display(), message);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let parsed: Value = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        let field = |key: &str| {
            parsed
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Ok(Self {
            name: field("name"),
            description: field("description"),
        })
    }
}

/// Favicon fields derived from project metadata
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetadataOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_description: Option<String>,
}

/// Service worker configuration derived from the output paths
pub fn derived_service_worker_config(paths: &OutputPaths) -> ServiceWorkerConfig {
    let dir = slash_path(&paths.dir);
    let dir = dir.trim_end_matches('/');
    ServiceWorkerConfig {
        static_file_globs: vec![format!("{dir}/**/*.{{js,html,css,json,ico,png,jpg,jpeg}}")],
        strip_prefix: format!("{dir}/"),
        replace_prefix: String::new(),
        navigate_fallback: Some(format!("{}index.html", paths.public_path)),
        cache_id: None,
    }
}

/// Merge defaults, project metadata and user options into the effective configuration
pub fn resolve_config(
    metadata: &ProjectMetadata,
    paths: &OutputPaths,
    options: &PwaOptions,
) -> PwaResult<PwaConfig> {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(FaviconConfig::default()))
        .merge(Serialized::defaults(MetadataOverrides {
            app_name: metadata.name.clone(),
            app_description: metadata.description.clone(),
        }));

    if let Some(user) = &options.favicon_config {
        if !user.is_object() {
            return Err(PwaError::Config(
                "faviconConfig must be an object".to_string(),
            ));
        }
        figment = figment.merge(Serialized::defaults(user));
    }

    let favicon_config: FaviconConfig = figment
        .extract()
        .map_err(|e| PwaError::Config(format!("faviconConfig: {e}")))?;

    let service_worker_config = options
        .service_worker_config
        .clone()
        .unwrap_or_else(|| derived_service_worker_config(paths));

    Ok(PwaConfig {
        should_create_favicon: options.should_create_favicon.unwrap_or(true),
        should_create_service_worker: options.should_create_service_worker.unwrap_or(true),
        favicon_image: options.favicon_image.clone(),
        favicon_config,
        service_worker_config,
        inject_html_tags: options.inject_html_tags.unwrap_or(true),
        registration_script: options.registration_script.clone(),
    })
}

/// Path as a string with forward slashes
pub(crate) fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
