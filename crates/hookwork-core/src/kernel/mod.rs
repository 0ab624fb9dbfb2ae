//! # Hookwork Kernel
//!
//! The `kernel` module hosts the application: it applies options, hands
//! registrations to the object graph, executes invocations, and drives the
//! start and stop passes under their time budgets.
//!
//! ## Key Components:
//!
//! - **Application Host**: [`App`](bootstrap::App) and its one-way
//!   [`AppState`](bootstrap::AppState), in the `bootstrap` submodule.
//! - **Options**: [`AppOption`](option::AppOption) values and the routing table
//!   that decides whether an option declared in a module applies to that
//!   module or to the root, in the `option` submodule.
//! - **Core Constants**: default budgets and channel capacities in `constants`.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) and a `Result`
//!   alias in the `error` submodule.
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod option;

pub use bootstrap::{App, AppState};
pub use error::{Error, MultiError, Result};
pub use option::{AppOption, ErrorHandler, OptionKind, Route};
