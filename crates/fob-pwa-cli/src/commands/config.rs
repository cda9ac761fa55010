//! `fob-pwa config`

use fob_plugin_pwa::{resolve_config, OutputPaths, ProjectMetadata};

use crate::cli::ConfigArgs;
use crate::config::CliConfig;
use crate::error::Result;

/// Print the effective plugin configuration as pretty JSON on stdout
pub async fn execute(args: ConfigArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = CliConfig::load(&args.pwa, &cwd)?;

    let metadata = ProjectMetadata::discover(&config.context_dir());
    let paths = OutputPaths::resolve(&config.output());
    let effective = resolve_config(&metadata, &paths, &config.pwa)?;

    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}
