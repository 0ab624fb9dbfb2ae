//! # Hookwork Lifecycle
//!
//! Start/stop hooks and the ordered sequence that drives them.
//!
//! ## Key Components:
//!
//! - [`Hook`]: an `on_start`/`on_stop` pair; either side defaults to a no-op.
//! - [`HookFn`]: builds a [`Hook`] from closures.
//! - [`HookSequence`]: runs hooks forward on start and backward on stop,
//!   tracking how many have started (the high-water mark).
//! - [`Lifecycle`]: the clonable handle constructors and invocations use to
//!   append hooks to the application's sequence.
//!
//! ## Cancellation contract
//!
//! Hooks receive a [`Context`](crate::runtime::Context). When a pass exceeds
//! its budget the caller gets a deadline error right away, but the hook that
//! is currently running is **not** aborted: it keeps running until it returns,
//! and the rest of the pass continues behind it. A hook that holds resources
//! should select on `ctx.done()` and return early. Do not add hard
//! cancellation around hooks; rollback relies on the high-water mark only
//! moving when a hook returns.
pub mod handle;
pub mod hook;
pub mod sequence;

pub use handle::Lifecycle;
pub use hook::{Hook, HookFn};
pub use sequence::HookSequence;
