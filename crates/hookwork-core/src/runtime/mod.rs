//! # Hookwork Runtime Helpers
//!
//! Cancellation contexts handed to hooks, and the deadline runner that bounds
//! the wall-clock time of a start or stop pass.
//!
//! A pass that runs out of time is **abandoned, not cancelled**:
//! [`run_with_deadline`] returns the context error as soon as the context is
//! done, while the spawned pass keeps running in the background until it
//! finishes on its own. Its eventual result is discarded. Hooks that want to
//! stop early must watch [`Context::done`] themselves.
pub mod context;
pub mod deadline;

pub use context::{Context, ContextError};
pub use deadline::run_with_deadline;
