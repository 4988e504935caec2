//! Diagnostic logging for the CLI.
//!
//! Library crates emit `tracing` events; this installs the subscriber that writes them to
//! stderr so they never mix with command output.

use std::io;

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a log filter, e.g. `STARK_LOG=stark_kb=debug`.
pub const LOG_ENV: &str = "STARK_LOG";

/// Filter used when neither `-v` nor [`LOG_ENV`] is given.
const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter directive forced by a `-v` count, or `None` to defer to the environment.
fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        _ => Some("debug"),
    }
}

/// Builds the event filter for a verbosity count.
fn build_filter(verbose: u8) -> EnvFilter {
    match verbosity_directive(verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Installs the global stderr subscriber.
pub fn init(verbose: u8) {
    let installed = fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if let Err(e) = installed {
        eprintln!("warning: logging unavailable: {e}");
    }
}
