//! Logging system for cmkits.
//!
//! Installs a `tracing` subscriber that writes to stderr (filtered by
//! `RUST_LOG`, falling back to the given default directive) and to any
//! number of configured log files.

use crate::util::fs::expand_path;
use cmkits_types::config::{LogConfig, LogFormat};
use cmkits_types::{KitError, LogLevel, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "cmkits=info";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps file writers flushing until dropped.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

/// Initialize the logging system with default configuration.
pub fn init_default() -> Result<()> {
    init(DEFAULT_FILTER, &[]).map(|_| ())
}

/// Initialize logging to stderr plus one output per `configs` entry.
pub fn init(default_filter: &str, configs: &[LogConfig]) -> Result<LogGuard> {
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter)
        .boxed()];
    let mut guards = Vec::new();

    for config in configs {
        if config.level == LogLevel::None {
            continue;
        }
        let (layer, guard) = file_layer(config)?;
        layers.push(layer);
        guards.push(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| KitError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(LogGuard { _guards: guards })
}

fn file_layer(config: &LogConfig) -> Result<(BoxedLayer, WorkerGuard)> {
    let path = expand_path(&config.path);
    let file_name = path
        .file_name()
        .ok_or_else(|| KitError::Config(format!("Log path has no file name: {}", config.path)))?
        .to_owned();
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();

    std::fs::create_dir_all(&dir)
        .map_err(|e| KitError::Config(format!("Failed to create log directory {:?}: {}", dir, e)))?;

    let appender = if config.daily {
        tracing_appender::rolling::daily(&dir, &file_name)
    } else {
        tracing_appender::rolling::never(&dir, &file_name)
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::new(config.level.as_filter());

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    };

    Ok((layer, guard))
}
