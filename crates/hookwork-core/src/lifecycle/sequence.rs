use std::fmt;
use std::sync::Arc;

use crate::kernel::error::{Error, Result};
use crate::lifecycle::Hook;
use crate::logging::{LogLogger, Logger};
use crate::runtime::Context;

/// Ordered hooks plus the count of hooks that have started.
///
/// `started` only grows during [`start`](Self::start) and only shrinks during
/// [`stop`](Self::stop), so it always satisfies `0 <= started <= len`. It is
/// the bound for the next stop pass: a hook whose `on_start` failed is not
/// counted, so its `on_stop` is never called for that attempt.
pub struct HookSequence {
    hooks: Vec<Arc<dyn Hook>>,
    started: usize,
    logger: Arc<dyn Logger>,
}

impl HookSequence {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            hooks: Vec::new(),
            started: 0,
            logger,
        }
    }

    /// Adds a hook at the end of the sequence.
    pub fn append(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Number of hooks whose `on_start` completed successfully.
    pub fn started(&self) -> usize {
        self.started
    }

    /// Runs `on_start` in index order, beginning at the high-water mark.
    ///
    /// Stops at the first failure and returns it; hooks appended after an
    /// earlier pass are picked up by the next call. No further hook is
    /// started once `ctx` is done.
    pub async fn start(&mut self, ctx: &Context) -> Result<()> {
        while self.started < self.hooks.len() {
            if let Some(reason) = ctx.err() {
                return Err(Error::Deadline(reason));
            }
            let index = self.started;
            let hook = Arc::clone(&self.hooks[index]);
            self.logger.info(&format!("START\t\t{}", hook.name()));

            if let Err(source) = hook.on_start(ctx.clone()).await {
                return Err(Error::HookStart {
                    index,
                    name: hook.name().to_string(),
                    source: Arc::from(source),
                });
            }
            self.started += 1;
        }
        Ok(())
    }

    /// Runs `on_stop` in reverse order for every started hook.
    ///
    /// Every hook in range is attempted; failures are collected and returned
    /// together once the pass is over.
    pub async fn stop(&mut self, ctx: &Context) -> Result<()> {
        let mut errors = Vec::new();

        while self.started > 0 {
            let index = self.started - 1;
            let hook = Arc::clone(&self.hooks[index]);
            self.logger.info(&format!("STOP\t\t{}", hook.name()));

            if let Err(source) = hook.on_stop(ctx.clone()).await {
                self.logger
                    .error(&format!("hook {} failed to stop: {}", hook.name(), source));
                errors.push(Error::HookStop {
                    index,
                    name: hook.name().to_string(),
                    source: Arc::from(source),
                });
            }
            self.started -= 1;
        }

        match Error::combine(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for HookSequence {
    fn default() -> Self {
        Self::new(Arc::new(LogLogger))
    }
}

impl fmt::Debug for HookSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSequence")
            .field("hooks", &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("started", &self.started)
            .finish()
    }
}
