//! Tracing subscriber for the qh-preview binary.
//!
//! Stdout carries the preview, so log lines go to the configured log file or
//! to stderr.

use std::fs::File;
use std::io;
use std::sync::Mutex;

use helix_quickhelp::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

const FALLBACK_LEVEL: &str = "info";

/// `RUST_LOG` wins over the configured level; an unparsable level falls
/// back to `info`.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install the global subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false);

    match config.log_file.as_ref().map(|path| (path, File::create(path))) {
        Some((_, Ok(file))) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        Some((path, Err(err))) => {
            builder.with_writer(io::stderr).init();
            log::warn!("cannot open log file {}: {err}", path.display());
        }
        None => builder.with_writer(io::stderr).init(),
    }
}
