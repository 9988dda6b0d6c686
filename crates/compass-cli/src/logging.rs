//! Tracing setup for the `compass` binary.
//!
//! Every command logs into the same daily rolling file. Call [`init`] once
//! near process start; later calls return the already resolved path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use color_eyre::eyre::{eyre, Result, WrapErr};
use compass_core::config::{LoggingConfig, DEFAULT_APP_NAME};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_config(format: &str) -> Self {
        if format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Installs the global subscriber and returns today's log file path.
///
/// `RUST_LOG` overrides `config.level`. `force_quiet` keeps events off
/// stderr regardless of config; the TUI needs the terminal to itself.
pub fn init(config: &LoggingConfig, force_quiet: bool) -> Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(config.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("failed to create log directory: {}", dir.display()))?;

    let file_name = format!("{DEFAULT_APP_NAME}.log");
    let today = Local::now().format("%Y-%m-%d").to_string();
    let full_path = dir.join(format!("{file_name}.{today}"));

    let appender = rolling::daily(&dir, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let emit_stderr = config.stderr && !force_quiet;

    match (LogFormat::from_config(&config.format), emit_stderr) {
        (LogFormat::Text, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init(),
        (LogFormat::Text, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Json, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        (LogFormat::Json, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| eyre!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

fn resolve_log_dir(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(dir) => expand_home(Path::new(dir)),
        None => default_data_dir(),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Platform data dir, e.g. `~/.local/share/career-compass` on Linux.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join(DEFAULT_APP_NAME)
}
