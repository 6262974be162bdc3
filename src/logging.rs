//! Tracing setup for the Filedrop binary.
//!
//! The level comes from `[logging] level` (or `FILEDROP_LOG_LEVEL`). `RUST_LOG`
//! directives are honoured on top of it, so `RUST_LOG=tower_http=debug` turns
//! on the per-request spans emitted by the router's `TraceLayer`.
//!
//! Events always go to stdout. With `[logging] file` set they are also
//! appended to that file without ANSI colours.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Parse a configured level name. Unknown names fall back to `info`.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(parse_level(level).into())
}

/// Install the global subscriber described by `config`.
///
/// Fails if the log file or its parent directory cannot be created. The
/// caller can then fall back to [`init_console_only`].
pub fn init(config: &LoggingConfig) -> Result<()> {
    let Some(path) = config.file.as_deref().map(Path::new) else {
        init_console_only(&config.level);
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let log_file = OpenOptions::new().create(true).append(true).open(path)?;
    let writer = std::io::stdout.and(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(filter_for(&config.level))
        .init();

    Ok(())
}

/// Install a stdout-only subscriber at `level`.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(filter_for(level))
        .init();
}
