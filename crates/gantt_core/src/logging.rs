//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Capture panics from model code as structured log events.
//!
//! # Invariants
//! - Init is idempotent for the same directory and level.
//! - Re-initialization with a different directory or level is rejected.
//! - Library code logs through `log` macros only and never calls init itself.

use crate::config::LoggingConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, Level};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "gantt_core";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Starts the rolling file logger under `log_dir` at `level`.
///
/// # Errors
/// - `level` is not trace|debug|info|warn|error.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging is already active with another level or directory.
/// - The flexi_logger backend fails to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    if let Some(active) = LOGGING_STATE.get() {
        return active.ensure_same(level, &log_dir);
    }

    LOGGING_STATE
        .get_or_try_init(|| start_file_logger(level, log_dir.clone()))?
        .ensure_same(level, &log_dir)
}

impl LoggingState {
    fn ensure_same(&self, level: &'static str, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{level}`",
                self.level
            ));
        }
        Ok(())
    }
}

fn start_file_logger(level: &'static str, log_dir: PathBuf) -> Result<LoggingState, String> {
    std::fs::create_dir_all(&log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let file_spec = FileSpec::default()
        .directory(log_dir.as_path())
        .basename(LOG_FILE_BASENAME);
    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(file_spec)
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();
    info!(
        "event=logging_init module=core status=ok build_mode={} version={} level={level} log_dir={}",
        build_mode(),
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    Ok(LoggingState {
        level,
        log_dir,
        _handle: handle,
    })
}

/// Initializes logging from a config section.
///
/// A missing `log_dir` means file logging is disabled; this returns `Ok(false)`
/// without touching global state. Returns `Ok(true)` once logging is active.
pub fn init_logging_from(config: &LoggingConfig) -> Result<bool, String> {
    match config.log_dir.as_deref() {
        Some(log_dir) => init_logging(&config.level, log_dir).map(|()| true),
        None => Ok(false),
    }
}

/// `(level, log_dir)` of the active logger, `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Maps a configured level name onto the canonical lowercase form.
///
/// Accepts any case and the `warning` alias; `off` is not a valid file level.
pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    let wanted = level.trim();
    let parsed = if wanted.eq_ignore_ascii_case("warning") {
        Ok(Level::Warn)
    } else {
        wanted.parse::<Level>()
    };
    parsed.map(level_name).map_err(|_| {
        format!("unsupported log level `{wanted}`; expected trace|debug|info|warn|error")
    })
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warn",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

pub(crate) fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(log_dir.trim());
    if path.as_os_str().is_empty() {
        Err("log directory is empty".to_string())
    } else if path.is_relative() {
        Err(format!("log directory `{}` is not absolute", path.display()))
    } else {
        Ok(path)
    }
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // Payload may carry task labels; strip newlines and cap length.
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            error!(
                "event=panic_captured module=core status=error location={location} payload={}",
                sanitize_message(&panic_payload(info), MAX_PANIC_PAYLOAD_CHARS)
            );
            previous(info);
        }));
    });
}

fn panic_payload(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut out: String = flattened.chars().take(max_chars).collect();
    if flattened.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
