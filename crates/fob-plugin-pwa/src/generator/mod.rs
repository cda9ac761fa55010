//! Generator interfaces
//!
//! Icon rendering and service worker generation are delegated to pluggable
//! generators. The plugin ships [`RasterIconGenerator`] and [`PrecacheGenerator`]
//! as defaults.

mod precache;
mod raster;

pub use precache::PrecacheGenerator;
pub use raster::RasterIconGenerator;

use async_trait::async_trait;
use std::path::Path;

use crate::config::{FaviconConfig, ServiceWorkerConfig};
use crate::error::GeneratorError;

/// Binary image produced by an icon generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub name: String,
    pub contents: Vec<u8>,
}

/// Auxiliary text file produced by an icon generator (web app manifest, browserconfig.xml)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub name: String,
    pub contents: String,
}

/// Everything an icon generator returns for one source image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconSet {
    pub images: Vec<IconImage>,
    pub files: Vec<IconFile>,
    /// Tags to embed in the document head, in order
    pub html: Vec<String>,
}

/// Produces icon images, auxiliary files and HTML tags from a source image
#[async_trait]
pub trait IconGenerator: Send + Sync + std::fmt::Debug {
    async fn generate(
        &self,
        source: &Path,
        config: &FaviconConfig,
    ) -> Result<IconSet, GeneratorError>;
}

/// Produces the service worker script
#[async_trait]
pub trait ManifestGenerator: Send + Sync + std::fmt::Debug {
    async fn generate(&self, config: &ServiceWorkerConfig) -> Result<String, GeneratorError>;
}
