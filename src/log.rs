//! Leveled diagnostic output.
//!
//! Messages go to a board-supplied sink, usually a UART wrapped in a
//! [`SerialSink`]. Until a sink is installed everything is dropped.
//! Emission never blocks: if the logger or the sink is busy on the other
//! core, the message is discarded.

use core::fmt::{self, Write};
use lazy_static::lazy_static;
use spin::Mutex;

use crate::config;

/// Message severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse `debug`, `info`, `warn` or `error` (any case).
    pub fn parse(s: &str) -> Option<Level> {
        [Level::Debug, Level::Info, Level::Warn, Level::Error]
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Level::Debug => "[DEBUG]",
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }
}

/// Destination for log lines.
pub trait LogSink: Sync {
    /// Write one message. Must not block; drop the message instead.
    fn emit(&self, level: Level, args: fmt::Arguments);
}

/// Formats `[LEVEL] message` lines onto any `core::fmt::Write` port.
/// Errors are highlighted in bold red.
pub struct SerialSink<W> {
    port: Mutex<W>,
}

impl<W: Write + Send> SerialSink<W> {
    pub const fn new(port: W) -> Self {
        SerialSink { port: Mutex::new(port) }
    }

    /// Give back the wrapped port.
    pub fn into_inner(self) -> W {
        self.port.into_inner()
    }
}

impl<W: Write + Send> LogSink for SerialSink<W> {
    fn emit(&self, level: Level, args: fmt::Arguments) {
        if let Some(mut port) = self.port.try_lock() {
            // A failing port has nowhere to report to.
            let _ = write_line(&mut *port, level, args);
        }
    }
}

fn write_line(port: &mut impl Write, level: Level, args: fmt::Arguments) -> fmt::Result {
    if level == Level::Error {
        writeln!(port, "\x1b[1;31m{} {}\x1b[0m", level.tag(), args)
    } else {
        writeln!(port, "{} {}", level.tag(), args)
    }
}

struct Logger {
    sink: Option<&'static dyn LogSink>,
    max_level: Level,
}

impl Logger {
    /// The sink to use for `level`, if the message passes the filter.
    fn sink_for(&self, level: Level) -> Option<&'static dyn LogSink> {
        if level >= self.max_level {
            self.sink
        } else {
            None
        }
    }
}

lazy_static! {
    static ref LOGGER: Mutex<Logger> = Mutex::new(Logger {
        sink: None,
        max_level: config::default_log_level(),
    });
}

/// Install the sink all scheduler diagnostics are written to.
pub fn set_sink(sink: &'static dyn LogSink) {
    LOGGER.lock().sink = Some(sink);
}

/// Drop messages below `level`.
pub fn set_max_level(level: Level) {
    LOGGER.lock().max_level = level;
}

#[doc(hidden)]
pub fn _log(level: Level, args: fmt::Arguments) {
    // Copy the sink out so a slow port never holds the logger lock.
    let sink = LOGGER.try_lock().and_then(|logger| logger.sink_for(level));
    if let Some(sink) = sink {
        sink.emit(level, args);
    }
}

/// Log at DEBUG level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => ($crate::log::_log($crate::log::Level::Debug, format_args!($($arg)*)));
}

/// Log at INFO level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => ($crate::log::_log($crate::log::Level::Info, format_args!($($arg)*)));
}

/// Log at WARN level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => ($crate::log::_log($crate::log::Level::Warn, format_args!($($arg)*)));
}

/// Log at ERROR level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => ($crate::log::_log($crate::log::Level::Error, format_args!($($arg)*)));
}
