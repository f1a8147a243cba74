//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LogSettings;
use crate::error::AppError;

const LOG_FILE_PREFIX: &str = "session-server.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. When a log directory is set the
/// output goes to a daily rolling file and the returned guard must be held
/// until shutdown so buffered lines are flushed.
pub fn init_telemetry(settings: &LogSettings) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    let (writer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let fmt_layer = fmt::layer().with_target(true).with_writer(writer);
    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if settings.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };
    installed.map_err(|e| AppError::TelemetryError(e.to_string()))?;

    Ok(guard)
}
