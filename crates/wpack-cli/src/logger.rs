//! Tracing subscriber setup for the wpack binary.
//!
//! Verbosity is chosen in this order:
//! 1. `--verbose`: debug for the wpack crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the wpack crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "wpack_cli=debug,wpack_bundler=debug,wpack_config=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "wpack_cli=info,wpack_bundler=info,wpack_config=info";

/// Build the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether stderr output should carry ANSI colours.
///
/// `NO_COLOR` disables and `FORCE_COLOR` enables colours regardless of the
/// terminal.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
