//! Service worker manifest writer

use std::path::PathBuf;
use tracing::info;

use crate::error::{PwaError, PwaResult};
use crate::plugin::PwaBuild;
use crate::registration::SERVICE_WORKER_FILENAME;
use crate::writer::{write_output, EmittedFile};

/// Generate the service worker from the emitted output and write it at the output root.
///
/// Nothing is written when the generator fails.
pub(crate) async fn write_service_worker(build: &PwaBuild) -> PwaResult<PathBuf> {
    let contents = build
        .manifest_generator()
        .generate(&build.config.service_worker_config)
        .await
        .map_err(PwaError::ManifestGenerator)?;

    let file = EmittedFile::new(&build.paths.dir, SERVICE_WORKER_FILENAME, contents);
    let written = write_output(build.fs(), &file).await?;
    info!("wrote {}", SERVICE_WORKER_FILENAME);
    Ok(written)
}
