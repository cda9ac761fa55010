//! fob-pwa - progressive web app assets for an already built site.
//!
//! Parses arguments, installs logging and dispatches to the commands.

use clap::Parser;
use fob_pwa_cli::{cli, commands, error, logger};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Config(config_args) => commands::config_execute(config_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
