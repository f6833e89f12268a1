//! File logging. The terminal belongs to the UI, so nothing is ever
//! logged to stdout or stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

pub const LOG_FILE: &str = "casper-panel.log";

/// Install the global subscriber writing to `dir/casper-panel.log`.
///
/// The filter comes from `RUST_LOG` (default `info`). Returns `None` and
/// leaves logging disabled if the directory cannot be created. Keep the
/// guard alive until exit so buffered lines are flushed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    Some(guard)
}
