use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "plan_uploader.log";
const DEFAULT_DIRECTIVE: &str = "plan_uploader=info";

/// Installs the global subscriber: human-readable lines on stderr, so stdout
/// stays clean for step scripts, and a daily JSON log under `logs/`.
///
/// The returned guard owns the background file writer and flushes it when
/// dropped; hold it for the lifetime of `main`.
pub fn init_logging() -> WorkerGuard {
    let _ = fs::create_dir_all(LOG_DIR);

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(LOG_DIR, LOG_FILE));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    guard
}
