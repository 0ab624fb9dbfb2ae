use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::kernel::constants::SUBSCRIBER_CAPACITY;
use crate::signal::{Signal, os};

static GLOBAL_HUB: OnceLock<Arc<SignalHub>> = OnceLock::new();

/// Registry of subscriber channels.
///
/// Subscribers are never removed: the set only grows for the life of the hub.
/// Broadcasting never blocks; a subscriber whose buffer is still full simply
/// misses the signal.
#[derive(Debug, Default)]
pub struct SignalHub {
    subscribers: RwLock<Vec<mpsc::Sender<Signal>>>,
    watch_os: bool,
    os_forwarder: AtomicBool,
}

/// Outcome of one [`SignalHub::broadcast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that received the signal.
    pub delivered: usize,
    /// Subscribers whose buffer was full.
    pub missed: usize,
    /// Subscribers whose receiving end was dropped.
    pub closed: usize,
}

/// Receiving end of one subscriber channel (capacity 1).
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<Signal>,
}

impl Subscription {
    /// Waits for the next signal. Returns `None` only if the hub was dropped.
    pub async fn recv(&mut self) -> Option<Signal> {
        self.rx.recv().await
    }

    /// Returns a pending signal without waiting.
    pub fn try_recv(&mut self) -> Option<Signal> {
        self.rx.try_recv().ok()
    }
}

impl SignalHub {
    /// Creates an isolated hub that does not listen to OS signals.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide hub, created on first use and never destroyed.
    ///
    /// The first subscription made from inside a Tokio runtime starts a
    /// background task that forwards SIGINT/SIGTERM/SIGQUIT into it.
    pub fn global() -> Arc<SignalHub> {
        let hub = GLOBAL_HUB.get_or_init(|| {
            Arc::new(SignalHub {
                watch_os: true,
                ..SignalHub::default()
            })
        });
        Arc::clone(hub)
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&self) -> Subscription {
        if self.watch_os {
            self.ensure_os_forwarder();
        }

        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        Subscription { rx }
    }

    /// Delivers `signal` to every registered subscriber without blocking.
    pub fn broadcast(&self, signal: Signal) -> BroadcastReport {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut report = BroadcastReport::default();
        for tx in subscribers.iter() {
            match tx.try_send(signal) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => report.missed += 1,
                Err(TrySendError::Closed(_)) => report.closed += 1,
            }
        }
        log::debug!(
            "broadcast {}: delivered={} missed={} closed={}",
            signal,
            report.delivered,
            report.missed,
            report.closed
        );
        report
    }

    /// Number of subscribers registered so far.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether OS signals are being forwarded into this hub.
    pub fn forwards_os_signals(&self) -> bool {
        self.os_forwarder.load(Ordering::Acquire)
    }

    fn ensure_os_forwarder(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("no Tokio runtime; OS signals are not forwarded yet");
            return;
        };
        if self
            .os_forwarder
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        // Handlers must be registered before subscribe returns.
        let _guard = runtime.enter();
        match os::OsListener::new() {
            Ok(listener) => {
                runtime.spawn(os::forward_os_signals(listener, SignalHub::global()));
            }
            Err(e) => {
                log::error!("failed to listen for OS signals: {}", e);
                self.os_forwarder.store(false, Ordering::Release);
            }
        }
    }
}
