//! Logging utilities wrapping `tracing` initialisation

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_appender::non_blocking::{self, NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type LayeredEnvFilter = Layered<EnvFilter, Registry>;
type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Initialise the global tracing subscriber according to the provided logging options.
///
/// Subsequent calls are ignored to avoid reinitialisation panics.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(options.level.as_str())
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {e}", options.level)))?;

    let registry = Registry::default().with(env_filter);
    let installed = match file_layer::<LayeredEnvFilter>(options)? {
        Some(file) => registry
            .with(file)
            .with(stdout_layer(options.color))
            .try_init(),
        None => registry.with(stdout_layer(options.color)).try_init(),
    };
    installed.map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn file_layer<S>(options: &LoggingOptions) -> Result<Option<BoxedLayer<S>>>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    let Some(path) = options.file.as_ref() else {
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Config(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    let writer = match options.rotation {
        Some(rotation) => rolling_writer(path, dir, rotation)?,
        None => appending_writer(path)?,
    };

    Ok(Some(
        fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_ansi(false)
            .with_writer(writer)
            .with_target(true)
            .with_level(true)
            .boxed(),
    ))
}

fn rolling_writer(path: &Path, dir: &Path, rotation: LogRotation) -> Result<NonBlocking> {
    let file_name = path.file_name().ok_or_else(|| {
        Error::Config(format!(
            "Log file path '{}' must include a filename when rotation is enabled",
            path.display()
        ))
    })?;

    let appender = match rotation {
        LogRotation::Hourly => rolling::hourly(dir, file_name),
        LogRotation::Daily => rolling::daily(dir, file_name),
    };
    Ok(keep_guard(
        non_blocking::NonBlockingBuilder::default()
            .lossy(false)
            .finish(appender),
    ))
}

fn appending_writer(path: &Path) -> Result<NonBlocking> {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| Error::Config(format!("Failed to open log file {}: {e}", path.display())))?;

    Ok(keep_guard(
        non_blocking::NonBlockingBuilder::default()
            .lossy(false)
            .finish(file),
    ))
}

/// Park the worker guard for the life of the process so buffered lines are flushed.
fn keep_guard((writer, guard): (NonBlocking, WorkerGuard)) -> NonBlocking {
    let _ = FILE_GUARD.set(guard);
    writer
}

fn stdout_layer<S>(color: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(io::stdout)
        .with_ansi(color)
        .with_target(true)
        .with_level(true)
        .boxed()
}
