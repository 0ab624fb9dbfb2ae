//! # Hookwork Logging
//!
//! Every line the orchestrator emits goes through a [`Logger`], which an
//! application can swap with `AppOption::Logger`. The default [`LogLogger`]
//! forwards to the `log` facade under the `hookwork` target, so any
//! `log`-compatible backend (`env_logger` in the bundled binary) picks it up.
use std::process;

/// Sink for orchestrator log lines.
pub trait Logger: Send + Sync {
    fn info(&self, msg: &str);

    fn error(&self, msg: &str) {
        self.info(msg);
    }

    /// Logs `msg` and terminates the process. Nothing is recovered after this.
    fn fatal(&self, msg: &str) -> ! {
        self.error(msg);
        process::exit(1)
    }
}

/// Forwards to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn info(&self, msg: &str) {
        log::info!(target: "hookwork", "{}", msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: "hookwork", "{}", msg);
    }
}

/// Discards everything except the process exit of [`Logger::fatal`].
///
/// Some failures become hard to debug with this logger, since no errors are
/// printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn info(&self, _msg: &str) {}

    fn error(&self, _msg: &str) {}
}
