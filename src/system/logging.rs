//! Logging system initialization
//!
//! Sets up the global `tracing` subscriber from [`LoggingConfig`].

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

const DEFAULT_LOG_FILE_NAME: &str = "linkkeeper.log";

/// Initialize logging system based on configuration
///
/// Must be called once, after the configuration has been loaded. The returned
/// `WorkerGuard` has to be kept alive for the whole process so buffered log
/// lines are flushed on exit.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let to_file = config.file.as_deref().is_some_and(|f| !f.is_empty());
    let writer = build_writer(config);

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(!to_file);

    // 测试或重复初始化时全局 subscriber 可能已存在
    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("[WARN] Logging already initialized: {}", e);
    }

    guard
}

fn build_writer(config: &LoggingConfig) -> Box<dyn Write + Send + Sync> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Box::new(std::io::stdout());
    };

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path.parent().unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE_NAME);

        match rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
        {
            Ok(appender) => Box::new(appender),
            Err(e) => {
                eprintln!(
                    "[WARN] Failed to create rolling log appender in {}: {}; logging to stdout",
                    dir.display(),
                    e
                );
                Box::new(std::io::stdout())
            }
        }
    } else {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
        {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!(
                    "[WARN] Failed to open log file {}: {}; logging to stdout",
                    log_file, e
                );
                Box::new(std::io::stdout())
            }
        }
    }
}
