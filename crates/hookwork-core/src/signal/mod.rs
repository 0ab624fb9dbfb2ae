//! # Hookwork Signals
//!
//! Fan-out of termination signals to any number of waiters.
//!
//! - [`SignalHub`]: registry of subscriber channels. [`SignalHub::global`] is
//!   the process-wide instance that also forwards OS signals; tests build
//!   isolated hubs with [`SignalHub::new`].
//! - [`Subscription`]: the receiving end handed to one waiter.
//! - [`Shutdowner`]: in-process shutdown trigger, equivalent to an OS signal.
//! - [`os`]: platform signal listeners.
use std::fmt;

pub mod hub;
pub mod os;
pub mod shutdowner;

pub use hub::{BroadcastReport, SignalHub, Subscription};
pub use shutdowner::Shutdowner;

/// A termination request delivered through the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
    /// SIGQUIT
    Quit,
    /// Requested in-process through a [`Shutdowner`].
    Shutdown,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Interrupt => "interrupt",
            Signal::Terminate => "terminated",
            Signal::Quit => "quit",
            Signal::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
