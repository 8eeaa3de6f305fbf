//! Logging setup for draftex, with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level (or higher if the caller asks for more). Stdout
//! logging is enabled when `DRAFTEX_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`DRAFTEX_LOG`** (highest priority) - draftex-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for draftex crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/draftex/logs/draftex-<pid>.log`
//! - macOS: `~/Library/Application Support/draftex/logs/draftex-12345.log`
//! - Linux: `~/.local/share/draftex/logs/draftex-12345.log`
//!
//! Override with [`LogConfig::log_file_path`] or `DRAFTEX_LOG_FILE`.

use std::{env, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// This function respects the environment variable priority described in the module docs:
/// `DRAFTEX_LOG` > `RUST_LOG` > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program -- dropping it flushes
/// and stops the background file writer.
///
/// Safe to call multiple times -- will not crash if logging is already initialized.
pub fn init(config: LogConfig) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let override_path = config.log_file_path.or_else(|| env::var("DRAFTEX_LOG_FILE").ok().map(PathBuf::from));
    let (log_dir, filename) = resolve_log_path(override_path);

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = create_file_filter()?;
    let file_layer = fmt::layer().with_writer(non_blocking_file).with_ansi(false).with_filter(file_filter);

    let stdout_enabled =
        env::var("DRAFTEX_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = if stdout_enabled { Some(fmt::layer().with_filter(create_filter()?)) } else { None };

    Registry::default().with(file_layer).with(stdout_layer).try_init()?;

    Ok(LogGuard { _file_guard: file_guard, log_file: log_dir.join(&filename) })
}

/// Initialize logging for tests: stdout-only, safe to call more than once.
#[allow(clippy::let_unit_value)]
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter()?;
    fmt().with_env_filter(filter).try_init()?;
    Ok(())
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("draftex-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new(".")).to_path_buf();
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("draftex").join("logs");
    (dir, filename)
}

/// File filter: uses the user-specified level if set, otherwise defaults to `warn`.
fn create_file_filter() -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    if env::var("DRAFTEX_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    Ok(EnvFilter::new("warn"))
}

/// Build the `EnvFilter` honoring `DRAFTEX_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    if let Ok(draftex_log) = env::var("DRAFTEX_LOG") {
        return Ok(expand_draftex_log(&draftex_log));
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::new(rust_log));
    }
    Ok(EnvFilter::new(
        "warn,draftex_parse=info,draftex_layout=info,draftex_caret=info,draftex_edit=info,draftex_cli=info",
    ))
}

/// Expand a bare `DRAFTEX_LOG` level into a full filter string; left as-is if it already looks
/// like module-specific syntax (contains `=`, `:`, or `,`).
fn expand_draftex_log(draftex_log: &str) -> EnvFilter {
    if draftex_log.contains('=') || draftex_log.contains(':') || draftex_log.contains(',') {
        return EnvFilter::new(draftex_log);
    }
    EnvFilter::new(format!(
        "warn,draftex_parse={draftex_log},draftex_layout={draftex_log},draftex_caret={draftex_log},draftex_edit={draftex_log},draftex_cli={draftex_log}"
    ))
}
