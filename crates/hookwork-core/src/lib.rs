//! # Hookwork Core
//!
//! Orchestrates the start and shutdown of a long-running process made of
//! components. Components register ordered start/stop hooks; the application
//! starts them in registration order within a start budget, rolls back on
//! failure, waits for a termination signal, then stops them in reverse order
//! within a stop budget.
//!
//! ```no_run
//! use hookwork_core::{App, AppOption};
//! use hookwork_core::lifecycle::HookFn;
//!
//! # async fn demo() {
//! let app = App::new(vec![
//!     AppOption::hook(
//!         HookFn::new("server")
//!             .with_start(|_ctx| async move { Ok(()) })
//!             .with_stop(|_ctx| async move { Ok(()) })
//!             .arc(),
//!     ),
//! ]);
//! app.run().await;
//! # }
//! ```
pub mod config;
pub mod graph;
pub mod kernel;
pub mod lifecycle;
pub mod logging;
pub mod runtime;
pub mod scope;
pub mod signal;

// Re-export key public types for easier use by the binary
pub use config::{ConfigFormat, LifecycleConfig};
pub use graph::{Constructor, Decorator, Graph, Invocation, Lookup, Resolver};
pub use kernel::{App, AppOption, AppState, Error, Result};
pub use lifecycle::{Hook, HookFn, HookSequence, Lifecycle};
pub use logging::{LogLogger, Logger, NopLogger};
pub use runtime::{Context, ContextError, run_with_deadline};
pub use scope::{ScopeId, ScopeTree};
pub use signal::{Shutdowner, Signal, SignalHub, Subscription};

#[cfg(test)]
mod tests;
