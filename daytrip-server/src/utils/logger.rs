//! Logging Infrastructure
//!
//! Structured logging with an `EnvFilter`, optional JSON output and an
//! optional daily rolling file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional file output
///
/// `RUST_LOG` overrides `log_level` when set. The returned guard must be
/// held for the lifetime of the process when file output is enabled.
pub fn init_logger(log_level: &str, json: bool, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "daytrip-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let builder = builder.with_ansi(false).with_writer(writer);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
            return Some(guard);
        }
        eprintln!("Log directory {dir} is not writable, logging to stdout");
    }

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    None
}
