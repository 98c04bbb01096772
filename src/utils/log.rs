use std::fs::{self, File};
use std::io::stderr;
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use miette::{Context, IntoDiagnostic, miette};
use tracing::level_filters::LevelFilter;
use tracing::{Level, info};
use tracing_appender::non_blocking;
use tracing_subscriber::reload;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, reload::Handle, util::SubscriberInitExt,
};

use crate::utils::config::LogConfig;

pub trait LogHandle: Send + Sync {
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()>;
}

impl<S> LogHandle for Handle<EnvFilter, S>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()> {
        self.modify(|current| *current = new_filter)
            .into_diagnostic()
    }
}

pub struct LogHandles {
    console_handle: Mutex<Box<dyn LogHandle>>,
    file_handle: Mutex<Box<dyn LogHandle>>,
}

static LOG_HANDLES: OnceLock<LogHandles> = OnceLock::new();

fn install(config: &LogConfig) -> miette::Result<LogHandles> {
    #[cfg(feature = "dev-tools")]
    color_backtrace::install();

    // Console Layer with its own reloadable filter, RUST_LOG wins over the config
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .into_diagnostic()
            .with_context(|| format!("Invalid log level in config: {}", config.level))?,
    };
    let (console_filter, console_handle) = reload::Layer::new(console_filter);
    let console_layer = fmt::layer()
        .without_time()
        .with_writer(stderr)
        .with_filter(console_filter);

    // File Layer with its own reloadable filter
    let file_filter = if config.file {
        EnvFilter::new("debug")
    } else {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    };
    let (file_filter, file_handle) = reload::Layer::new(file_filter);

    fs::create_dir_all(&config.dir)
        .into_diagnostic()
        .with_context(|| format!("Failed to create log directory {}", config.dir.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = config.dir.join(format!("tessera_{timestamp}.log"));
    let log_file = File::create(&log_path)
        .into_diagnostic()
        .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

    let (non_blocking_writer, guard) = non_blocking(log_file);
    std::mem::forget(guard); // Keep the guard alive.

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false) // No colors in file
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .context("Failed to install tracing subscriber")?;

    Ok(LogHandles {
        console_handle: Mutex::new(Box::new(console_handle)),
        file_handle: Mutex::new(Box::new(file_handle)),
    })
}

/// Initialize tracing and backtrace. Calling it again is a no-op.
pub fn init(config: &LogConfig) -> miette::Result<()> {
    if LOG_HANDLES.get().is_some() {
        return Ok(());
    }
    let handles = install(config)?;
    let _ = LOG_HANDLES.set(handles);
    info!("Logging initialised (file logging: {})", config.file);
    Ok(())
}

fn handles() -> miette::Result<&'static LogHandles> {
    LOG_HANDLES
        .get()
        .ok_or_else(|| miette!("Logging has not been initialised"))
}

pub fn set_log_level(level: Level) -> miette::Result<()> {
    let new_filter = EnvFilter::new(level.to_string());

    handles()?
        .console_handle
        .lock()
        .map_err(|_| miette!("Console log handle poisoned"))?
        .set_filter(new_filter)
        .with_context(|| format!("Failed to modify log filter to level: {level}"))
}

pub fn toggle_file_logging(enable: bool) -> miette::Result<()> {
    let new_filter = if enable {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("off")
    };

    handles()?
        .file_handle
        .lock()
        .map_err(|_| miette!("File log handle poisoned"))?
        .set_filter(new_filter)
        .context("Failed to modify log filter")
}
