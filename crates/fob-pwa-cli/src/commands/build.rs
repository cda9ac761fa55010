//! `fob-pwa build`

use fob_plugin_pwa::{FobPwaPlugin, MemoryFileSystem, StaticDirHost};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::cli::BuildArgs;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::ui;

/// Run the plugin against the configured output directory
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start = Instant::now();
    let cwd = std::env::current_dir()?;
    let config = CliConfig::load(&args.pwa, &cwd)?;

    let output = config.output();
    if !output.path.is_dir() {
        return Err(CliError::OutputNotFound(output.path));
    }
    debug!("building pwa assets into {}", output.path.display());

    let mut host = StaticDirHost::new(config.context_dir(), output.clone());
    if args.dry_run {
        host = host.with_fs(Arc::new(MemoryFileSystem::new()));
    }

    let report = FobPwaPlugin::new(config.pwa).run(&host).await?;

    if args.dry_run {
        ui::info("Dry run, nothing was written. Would write:");
    }
    for path in &report.written {
        ui::written(path, &output.path);
    }
    ui::success(&format!(
        "Generated {} PWA files in {}",
        report.written.len(),
        ui::format_duration(start.elapsed())
    ));
    Ok(())
}
