use std::sync::Arc;

use crate::kernel::error::{Error, Result};
use crate::signal::{Signal, SignalHub};

/// Requests an in-process shutdown.
///
/// Waiters blocked on an application's subscription see the same thing they
/// would see for an OS signal, with [`Signal::Shutdown`] as the value.
#[derive(Debug, Clone)]
pub struct Shutdowner {
    hub: Arc<SignalHub>,
}

impl Shutdowner {
    pub fn new(hub: Arc<SignalHub>) -> Self {
        Self { hub }
    }

    /// Broadcasts [`Signal::Shutdown`] to every subscriber.
    ///
    /// Fails if a subscriber could not take the signal because its buffer was
    /// already full. Having no subscribers at all is not an error.
    pub fn shutdown(&self) -> Result<()> {
        let report = self.hub.broadcast(Signal::Shutdown);
        if report.missed > 0 {
            return Err(Error::ShutdownUndelivered {
                missed: report.missed,
                total: report.delivered + report.missed,
            });
        }
        Ok(())
    }
}
