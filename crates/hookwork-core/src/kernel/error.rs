//! # Hookwork Kernel Errors
//!
//! Defines the error type shared by every part of the orchestration core.
//!
//! [`Error`] separates the failure kinds a caller has to tell apart:
//! construction errors (a constructor or invocation failed), start-hook and
//! stop-hook errors, and deadline errors (a pass never finished inside its
//! budget). Several errors collected during one pass are folded into a single
//! [`MultiError`] through [`Error::append`].
use std::error::Error as StdError;
use std::fmt;
use std::result::Result as StdResult;
use std::sync::Arc;

use thiserror::Error as ThisError;

use crate::kernel::bootstrap::AppState;
use crate::runtime::ContextError;

/// Boxed error returned by user-supplied hooks, constructors and invocations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Shared form of [`BoxError`], so that [`Error`] can be cloned.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Custom error type for the hookwork orchestration core
#[non_exhaustive]
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// A hook's `on_start` returned an error.
    #[error("hook #{index} ({name}) failed to start: {source}")]
    HookStart {
        index: usize,
        name: String,
        #[source]
        source: SharedError,
    },

    /// A hook's `on_stop` returned an error.
    #[error("hook #{index} ({name}) failed to stop: {source}")]
    HookStop {
        index: usize,
        name: String,
        #[source]
        source: SharedError,
    },

    /// A start or stop pass did not finish before its context was done.
    #[error("{0}")]
    Deadline(#[from] ContextError),

    /// The background task running a pass panicked.
    #[error("{operation} panicked: {message}")]
    Panicked {
        operation: &'static str,
        message: String,
    },

    /// A constructor failed while being registered with the resolver.
    #[error("constructor {name} in scope '{scope}' failed: {source}")]
    Provide {
        name: String,
        scope: String,
        #[source]
        source: SharedError,
    },

    /// A decorator failed, or had nothing to decorate.
    #[error("decorator {name} in scope '{scope}' failed: {source}")]
    Decorate {
        name: String,
        scope: String,
        #[source]
        source: SharedError,
    },

    /// An invocation failed; this halts the remaining invocations.
    #[error("invocation {name} failed: {source}")]
    Invoke {
        name: String,
        #[source]
        source: SharedError,
    },

    /// A lookup asked for a type nobody provided.
    #[error("missing type {type_name} in scope '{scope}'")]
    MissingType {
        type_name: &'static str,
        scope: String,
    },

    /// An error registered up front through `AppOption::Error`.
    #[error("{0}")]
    Registered(SharedError),

    /// The hook sequence is locked by a pass that is still running.
    #[error("lifecycle is busy: hooks cannot be appended while a start or stop pass is running")]
    LifecycleBusy,

    /// An operation was requested in a state that does not allow it.
    #[error("cannot {operation} an application in state {state}")]
    InvalidState {
        operation: &'static str,
        state: AppState,
    },

    /// A programmatic shutdown could not reach every subscriber.
    #[error("shutdown signal missed {missed} of {total} subscribers")]
    ShutdownUndelivered { missed: usize, total: usize },

    /// Invalid lifecycle configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Several errors collected during one pass.
    #[error("{0}")]
    Multiple(MultiError),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

/// An ordered collection of errors displayed as one.
#[derive(Debug, Clone, Default)]
pub struct MultiError {
    errors: Vec<Error>,
}

impl MultiError {
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl StdError for MultiError {}

impl Error {
    /// Combines `self` and `other` into one error, flattening nested aggregates.
    pub fn append(self, other: Error) -> Error {
        let mut errors = self.into_errors();
        errors.extend(other.into_errors());
        Error::Multiple(MultiError { errors })
    }

    /// Folds collected errors: `None` when empty, the error itself when alone.
    pub fn combine(errors: Vec<Error>) -> Option<Error> {
        let mut iter = errors.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, Error::append))
    }

    /// The individual errors this error stands for.
    pub fn errors(&self) -> Vec<&Error> {
        match self {
            Error::Multiple(multi) => multi.errors.iter().collect(),
            other => vec![other],
        }
    }

    fn into_errors(self) -> Vec<Error> {
        match self {
            Error::Multiple(multi) => multi.errors,
            other => vec![other],
        }
    }

    /// Returns true when this error, or any error it aggregates, is a deadline error.
    pub fn is_deadline(&self) -> bool {
        self.errors().iter().any(|e| matches!(e, Error::Deadline(_)))
    }

    /// Wraps an arbitrary error registered up front.
    pub fn registered(err: impl Into<BoxError>) -> Self {
        let boxed: BoxError = err.into();
        Error::Registered(Arc::from(boxed))
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::HookStart { .. } => "hook_start",
            Error::HookStop { .. } => "hook_stop",
            Error::Deadline(_) => "deadline",
            Error::Panicked { .. } => "panicked",
            Error::Provide { .. } => "provide",
            Error::Decorate { .. } => "decorate",
            Error::Invoke { .. } => "invoke",
            Error::MissingType { .. } => "missing_type",
            Error::Registered(_) => "registered",
            Error::LifecycleBusy => "lifecycle_busy",
            Error::InvalidState { .. } => "invalid_state",
            Error::ShutdownUndelivered { .. } => "shutdown_undelivered",
            Error::Config(_) => "config",
            Error::Multiple(_) => "multiple",
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::registered(msg)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::registered(msg)
    }
}
