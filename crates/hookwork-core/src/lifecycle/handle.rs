use std::sync::Arc;

use tokio::sync::Mutex;

use crate::kernel::error::{Error, Result};
use crate::lifecycle::{Hook, HookSequence};
use crate::logging::Logger;
use crate::runtime::Context;

/// Shared handle to an application's [`HookSequence`].
///
/// The application provides one into the object graph so that constructors
/// and invocations can register hooks. Passes lock the sequence for their
/// whole duration, which keeps hooks from ever running concurrently.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    sequence: Arc<Mutex<HookSequence>>,
}

impl Lifecycle {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            sequence: Arc::new(Mutex::new(HookSequence::new(logger))),
        }
    }

    /// Appends a hook; only valid while no pass is running.
    pub fn append(&self, hook: Arc<dyn Hook>) -> Result<()> {
        let mut sequence = self.sequence.try_lock().map_err(|_| Error::LifecycleBusy)?;
        sequence.append(hook);
        Ok(())
    }

    /// Number of registered hooks, or `None` while a pass holds the sequence.
    pub fn len(&self) -> Option<usize> {
        self.sequence.try_lock().ok().map(|s| s.len())
    }

    pub async fn started(&self) -> usize {
        self.sequence.lock().await.started()
    }

    pub async fn start(&self, ctx: &Context) -> Result<()> {
        self.sequence.lock().await.start(ctx).await
    }

    pub async fn stop(&self, ctx: &Context) -> Result<()> {
        self.sequence.lock().await.stop(ctx).await
    }
}
