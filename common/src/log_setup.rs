use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and how much to log. `RUST_LOG` overrides `level`.
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: String,
    pub dir: PathBuf,
    pub file_prefix: String,
    pub max_files: usize,
    /// Mirror events to stdout (WARN and above to stderr).
    pub console: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_prefix: "skyfit".to_string(),
            max_files: 5,
            console: true,
        }
    }
}

impl LogOptions {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .with_context(|| format!("Invalid log filter: {}", self.level))
    }
}

/// Installs a daily-rolling file layer and an optional console layer.
///
/// Fails if the filter is invalid, the log directory cannot be created or a global
/// subscriber is already set.
pub fn try_setup_logging(options: &LogOptions) -> anyhow::Result<()> {
    let env_filter = options.env_filter()?;

    std::fs::create_dir_all(&options.dir)
        .with_context(|| format!("Failed to create log directory {}", options.dir.display()))?;

    let file_appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&options.file_prefix)
        .filename_suffix("log")
        .max_log_files(options.max_files)
        .build(&options.dir)
        .context("Failed to create log file appender")?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    if LOG_GUARD.set(guard).is_err() {
        anyhow::bail!("Logging already initialized");
    }

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_writer);

    let console_layer = options.console.then(|| {
        let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_ansi(true)
            .with_writer(console_writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Logger initialization failed")?;

    Ok(())
}

/// [`try_setup_logging`] with default options at `base_level`, panicking on failure.
pub fn setup_logging(base_level: &str) {
    let options = LogOptions::default().with_level(base_level);
    if let Err(e) = try_setup_logging(&options) {
        panic!("{e:#}");
    }
}
