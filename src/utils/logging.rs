//! Diagnostic logging to stderr
//!
//! Stdout is reserved for the JSON envelope, so every log record goes to
//! stderr. Verbose mode enables request tracing at debug level.

use fern::Dispatch;
use log::{LevelFilter, SetLoggerError};
use std::io::stderr;

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the global logger. Fails only if a logger is already set.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    Dispatch::new()
        .level(level_for(verbose))
        // Dependency internals stay quiet even in verbose mode
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{level}] {message}",
                level = record.level(),
                message = message,
            ))
        })
        .chain(stderr())
        .apply()
}
