//! Logging setup for the fob-pwa CLI.
//!
//! The level is picked in this order:
//! 1. `--verbose`: debug for the plugin and the CLI
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the plugin and the CLI

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "fob_plugin_pwa=debug,fob_pwa_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "fob_plugin_pwa=info,fob_pwa_cli=info";

/// Install the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether stderr should receive ANSI colors
///
/// `NO_COLOR` disables and `FORCE_COLOR` forces colors; otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
