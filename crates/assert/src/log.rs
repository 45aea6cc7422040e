//! Diagnostics about the library itself, written to stderr.

use crate::config::LogLevel;

pub(crate) fn warn(level: LogLevel, msg: &str) {
    if level >= LogLevel::Warn {
        eprintln!("[verity] warning: {}", msg);
    }
}

pub(crate) fn debug(level: LogLevel, msg: &str) {
    if level >= LogLevel::Debug {
        eprintln!("[verity] {}", msg);
    }
}
