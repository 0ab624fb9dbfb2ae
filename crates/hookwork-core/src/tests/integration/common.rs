#![cfg(test)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::kernel::error::BoxError;
use crate::kernel::{App, AppOption};
use crate::lifecycle::Hook;
use crate::logging::Logger;
use crate::runtime::Context;
use crate::signal::SignalHub;

// ===== JOURNAL =====

/// Ordered record of hook calls shared between recorders.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

// ===== MOCK HOOKS =====

/// Hook that writes `start:<name>` / `stop:<name>` to a journal.
pub struct Recorder {
    name: String,
    journal: Journal,
    fail_start: bool,
    fail_stop: bool,
    start_delay: Option<Duration>,
}

impl Recorder {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Arc::clone(journal),
            fail_start: false,
            fail_stop: false,
            start_delay: None,
        }
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Sleeps before recording the start, ignoring the context.
    pub fn slow_start(mut self, delay: Duration) -> Self {
        self.start_delay = Some(delay);
        self
    }

    pub fn arc(self) -> Arc<dyn Hook> {
        Arc::new(self)
    }
}

#[async_trait]
impl Hook for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_start(&self, _ctx: Context) -> Result<(), BoxError> {
        if let Some(delay) = self.start_delay {
            tokio::time::sleep(delay).await;
        }
        self.journal.lock().unwrap().push(format!("start:{}", self.name));
        if self.fail_start {
            return Err(format!("{} refused to start", self.name).into());
        }
        Ok(())
    }

    async fn on_stop(&self, _ctx: Context) -> Result<(), BoxError> {
        self.journal.lock().unwrap().push(format!("stop:{}", self.name));
        if self.fail_stop {
            return Err(format!("{} refused to stop", self.name).into());
        }
        Ok(())
    }
}

// ===== LOGGER =====

/// Logger that keeps every line and panics instead of exiting on `fatal`.
#[derive(Default)]
pub struct MemoryLogger {
    pub lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn info(&self, msg: &str) {
        self.lines.lock().unwrap().push(msg.to_string());
    }

    fn fatal(&self, msg: &str) -> ! {
        self.info(msg);
        panic!("fatal: {}", msg)
    }
}

// ===== APP HELPERS =====

/// Builds an app on a private signal hub, logging into `logger`.
pub fn isolated_app(logger: &Arc<MemoryLogger>, mut options: Vec<AppOption>) -> App {
    options.push(AppOption::SignalHub(Arc::new(SignalHub::new())));
    options.push(AppOption::Logger(Arc::clone(logger) as Arc<dyn Logger>));
    App::new(options)
}

pub fn memory_logger() -> Arc<MemoryLogger> {
    Arc::new(MemoryLogger::default())
}
