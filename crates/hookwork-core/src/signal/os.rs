//! # Cross-platform OS signal handling.
//!
//! **Unix platforms:** `SIGINT`, `SIGTERM`, `SIGQUIT`.
//!
//! **Windows:** `Ctrl-C` via [`tokio::signal::windows::ctrl_c`].
use std::io;
use std::sync::Arc;

use crate::signal::{Signal, SignalHub};

/// Registered OS signal handlers.
///
/// [`OsListener::new`] installs the handlers immediately, so it must run
/// inside a Tokio runtime context.
pub struct OsListener {
    inner: imp::Listener,
}

impl OsListener {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            inner: imp::Listener::new()?,
        })
    }

    /// Waits for the next termination signal.
    pub async fn recv(&mut self) -> Signal {
        self.inner.recv().await
    }
}

impl std::fmt::Debug for OsListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsListener").finish_non_exhaustive()
    }
}

/// Broadcasts every signal `listener` receives into `hub`, forever.
pub async fn forward_os_signals(mut listener: OsListener, hub: Arc<SignalHub>) {
    loop {
        let signal = listener.recv().await;
        hub.broadcast(signal);
    }
}

#[cfg(unix)]
mod imp {
    use std::io;

    use tokio::signal::unix::{SignalKind, signal};

    use crate::signal::Signal;

    pub(super) struct Listener {
        sigint: tokio::signal::unix::Signal,
        sigterm: tokio::signal::unix::Signal,
        sigquit: tokio::signal::unix::Signal,
    }

    impl Listener {
        pub(super) fn new() -> io::Result<Self> {
            Ok(Self {
                sigint: signal(SignalKind::interrupt())?,
                sigterm: signal(SignalKind::terminate())?,
                sigquit: signal(SignalKind::quit())?,
            })
        }

        pub(super) async fn recv(&mut self) -> Signal {
            tokio::select! {
                _ = self.sigint.recv()  => Signal::Interrupt,
                _ = self.sigterm.recv() => Signal::Terminate,
                _ = self.sigquit.recv() => Signal::Quit,
            }
        }
    }
}

#[cfg(windows)]
mod imp {
    use std::io;

    use tokio::signal::windows::{CtrlC, ctrl_c};

    use crate::signal::Signal;

    pub(super) struct Listener {
        ctrl_c: CtrlC,
    }

    impl Listener {
        pub(super) fn new() -> io::Result<Self> {
            Ok(Self { ctrl_c: ctrl_c()? })
        }

        pub(super) async fn recv(&mut self) -> Signal {
            self.ctrl_c.recv().await;
            Signal::Interrupt
        }
    }
}
