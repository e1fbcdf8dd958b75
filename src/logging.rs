//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact or JSON formats, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - All console output goes to stderr; stdout stays empty.
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.
//!
//! File logging is refused if any ancestor of the file path is a symlink.

use anyhow::{Context, Result};
use chrono::Local;
use pincopy::LogLevel;
use pincopy::config::path_has_symlink_ancestor;
use pincopy::output as out;
use pincopy::platform::open_log_file_secure_append;
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> stdfmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

#[inline]
fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    let level_str = match level_filter {
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
        _ => "info",
    };
    EnvFilter::new(level_str)
}

/// Open a non-blocking append writer for `path`, or explain on stderr why not.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "refusing file logging: an ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!(
                "cannot check log path {} for symlinks: {}",
                path.display(),
                e
            ));
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("cannot open log file {}: {}", path.display(), e));
            None
        }
    }
}

/// Initialize tracing based on LogLevel and format. Returns an optional WorkerGuard
/// if a file appender is created (must be held until exit to flush logs).
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_from_level(to_level_filter(lvl));
    // Colors only when stderr is a terminal, same as `output`.
    let ansi = atty::is(atty::Stream::Stderr);
    let file = log_file.and_then(maybe_open_non_blocking_writer);

    let guard = match (file, json) {
        (Some((writer, guard)), true) => {
            let console = tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_writer(std::io::stderr);
            let file_layer = tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(writer);
            registry()
                .with(env_filter)
                .with(console)
                .with(file_layer)
                .try_init()
                .context("installing tracing subscriber")?;
            Some(guard)
        }
        (Some((writer, guard)), false) => {
            let console = tsfmt::layer()
                .with_timer(LocalHumanTime)
                .with_target(false)
                .with_ansi(ansi)
                .compact()
                .with_writer(std::io::stderr);
            let file_layer = tsfmt::layer()
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .compact()
                .with_writer(writer);
            registry()
                .with(env_filter)
                .with(console)
                .with(file_layer)
                .try_init()
                .context("installing tracing subscriber")?;
            Some(guard)
        }
        (None, true) => {
            let console = tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalHumanTime)
                .with_target(true)
                .with_writer(std::io::stderr);
            registry()
                .with(env_filter)
                .with(console)
                .try_init()
                .context("installing tracing subscriber")?;
            None
        }
        (None, false) => {
            let console = tsfmt::layer()
                .with_timer(LocalHumanTime)
                .with_target(false)
                .with_ansi(ansi)
                .compact()
                .with_writer(std::io::stderr);
            registry()
                .with(env_filter)
                .with(console)
                .try_init()
                .context("installing tracing subscriber")?;
            None
        }
    };
    Ok(guard)
}
