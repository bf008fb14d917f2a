//! Ambient logging for the paging subsystem.
//!
//! Mirrors the base kernel's tick-stamped serial logger rather than pulling
//! in the `log` crate: a global tick counter, a small level enum, and
//! `log!`/`log_debug!`/`log_warn!`/`log_error!` macros that format through a
//! single `_log` entry point. Output goes through the `sink` module so tests
//! can capture it instead of writing to a real serial port.

use core::sync::atomic::{AtomicU64, Ordering};

static TICK_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Advance the logical tick used for log timestamps. Called by the aging
/// clock once per scheduler tick, so log lines can be correlated with
/// `access_history` shifts.
pub fn tick() -> u64 {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}

pub fn get_ticks() -> u64 {
    TICK_COUNTER.load(Ordering::Relaxed)
}

pub fn _log(level: LogLevel, args: core::fmt::Arguments) {
    let tick = get_ticks();
    crate::sink::_print(format_args!("[{:>10}][{}] {}\n", tick, level.as_str(), args));
}

#[macro_export]
macro_rules! log_level {
    ($level:expr, $($arg:tt)*) => {
        $crate::logger::_log($level, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log_level!($crate::logger::LogLevel::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log_level!($crate::logger::LogLevel::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log_level!($crate::logger::LogLevel::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log_level!($crate::logger::LogLevel::Error, $($arg)*)
    };
}
