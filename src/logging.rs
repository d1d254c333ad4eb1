use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{fmt::time::UtcTime, EnvFilter, prelude::*};

use crate::config::{LogFormat, LoggingConfig};

/// Initialize logging: stderr plus an optional rolling file appender.
///
/// Logs stay off stdout, which carries the signaling configuration.
///
/// Filter precedence: `logging.level` from config, then `RUST_LOG`, then
/// "info". Calling this twice is harmless; the second call is ignored.
pub fn init_with_config(cfg: &LoggingConfig) {
    let file_writer = if cfg.enable_file_logging {
        build_file_writer(cfg)
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(env_filter(cfg));

    let _ = match cfg.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .with(file_writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(writer)
            }))
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .with(file_writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(writer)
            }))
            .try_init(),
    };
}

fn env_filter(cfg: &LoggingConfig) -> EnvFilter {
    match &cfg.level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn rotation(raw: &str) -> Rotation {
    match raw.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn build_file_writer(cfg: &LoggingConfig) -> Option<NonBlocking> {
    if std::fs::create_dir_all(&cfg.dir).is_err() {
        eprintln!(
            "Failed to create log directory '{}', continuing with console logs",
            cfg.dir
        );
        return None;
    }

    let file_appender = tracing_appender::rolling::RollingFileAppender::new(
        rotation(&cfg.rotation),
        &cfg.dir,
        &cfg.filename,
    );
    let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);

    // Keep guard alive for process lifetime
    let _leaked: &'static _ = Box::leak(Box::new(file_guard));

    Some(non_blocking)
}
