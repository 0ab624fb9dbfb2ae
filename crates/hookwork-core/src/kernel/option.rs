//! # Application Options
//!
//! [`AppOption`] values configure an [`App`](crate::kernel::App) before any
//! invocation runs. Options declared inside a module are routed by
//! [`OptionKind::route`]: registrations that live in a namespace (constructors,
//! decorators, hooks, nested modules) stay in the module's scope, while process-wide
//! settings (invocations, error handlers, budgets, logger, signal hub,
//! registered errors) always land on the root.
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LifecycleConfig;
use crate::graph::{Constructor, Decorator, Invocation, Lookup};
use crate::kernel::constants::DEFAULT_TIMEOUT;
use crate::kernel::error::{BoxError, Error};
use crate::lifecycle::Hook;
use crate::logging::{LogLogger, Logger};
use crate::scope::{ScopeId, ScopeTree};
use crate::signal::SignalHub;

/// Receives the terminal construction error when invocations fail.
pub trait ErrorHandler: Send + Sync {
    fn handle_error(&self, err: &Error);
}

impl<F> ErrorHandler for F
where
    F: Fn(&Error) + Send + Sync,
{
    fn handle_error(&self, err: &Error) {
        self(err)
    }
}

/// One unit of application configuration.
pub enum AppOption {
    /// Registers constructors in the current scope.
    Provide(Vec<Constructor>),
    /// Registers decorators in the current scope, applied once every
    /// constructor is provided.
    Decorate(Vec<Decorator>),
    /// Registers invocations, executed once at the root in registration order.
    Invoke(Vec<Invocation>),
    /// Registers hooks in the current scope.
    Hook(Vec<Arc<dyn Hook>>),
    /// Registers handlers for construction errors.
    ErrorHook(Vec<Arc<dyn ErrorHandler>>),
    StartTimeout(Duration),
    StopTimeout(Duration),
    /// Sets both budgets from a parsed configuration.
    Config(LifecycleConfig),
    Logger(Arc<dyn Logger>),
    /// Uses this hub instead of the process-wide one.
    SignalHub(Arc<SignalHub>),
    /// Short-circuits construction with already known errors.
    Error(Vec<Error>),
    /// Bundles options; each member is routed on its own.
    Options(Vec<AppOption>),
    /// Declares a named child scope.
    Module { name: String, options: Vec<AppOption> },
}

/// Discriminant of an [`AppOption`], used by the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Provide,
    Decorate,
    Invoke,
    Hook,
    ErrorHook,
    StartTimeout,
    StopTimeout,
    Config,
    Logger,
    SignalHub,
    Error,
    Options,
    Module,
}

/// Where an option takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The root application, wherever the option was declared.
    Root,
    /// The scope the option was declared in.
    Scope,
    /// Not applied itself; each member is routed individually.
    Members,
}

impl OptionKind {
    /// The routing table.
    pub const fn route(self) -> Route {
        match self {
            OptionKind::Invoke
            | OptionKind::ErrorHook
            | OptionKind::StartTimeout
            | OptionKind::StopTimeout
            | OptionKind::Config
            | OptionKind::Logger
            | OptionKind::SignalHub
            | OptionKind::Error => Route::Root,
            OptionKind::Provide
            | OptionKind::Decorate
            | OptionKind::Hook
            | OptionKind::Module => Route::Scope,
            OptionKind::Options => Route::Members,
        }
    }
}

impl AppOption {
    pub fn kind(&self) -> OptionKind {
        match self {
            AppOption::Provide(_) => OptionKind::Provide,
            AppOption::Decorate(_) => OptionKind::Decorate,
            AppOption::Invoke(_) => OptionKind::Invoke,
            AppOption::Hook(_) => OptionKind::Hook,
            AppOption::ErrorHook(_) => OptionKind::ErrorHook,
            AppOption::StartTimeout(_) => OptionKind::StartTimeout,
            AppOption::StopTimeout(_) => OptionKind::StopTimeout,
            AppOption::Config(_) => OptionKind::Config,
            AppOption::Logger(_) => OptionKind::Logger,
            AppOption::SignalHub(_) => OptionKind::SignalHub,
            AppOption::Error(_) => OptionKind::Error,
            AppOption::Options(_) => OptionKind::Options,
            AppOption::Module { .. } => OptionKind::Module,
        }
    }

    pub fn provide(constructor: Constructor) -> Self {
        AppOption::Provide(vec![constructor])
    }

    /// Shorthand for providing a constructor closure.
    pub fn provide_fn<T, F>(name: impl Into<String>, f: F) -> Self
    where
        T: std::any::Any + Send + Sync,
        F: FnOnce(&dyn Lookup) -> Result<T, BoxError> + Send + 'static,
    {
        AppOption::provide(Constructor::new(name, f))
    }

    pub fn supply<T: std::any::Any + Send + Sync>(value: T) -> Self {
        AppOption::provide(Constructor::value(value))
    }

    pub fn decorate<T, F>(name: impl Into<String>, f: F) -> Self
    where
        T: std::any::Any + Send + Sync,
        F: FnOnce(Arc<T>, &dyn Lookup) -> Result<T, BoxError> + Send + 'static,
    {
        AppOption::Decorate(vec![Decorator::new(name, f)])
    }

    pub fn invoke<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(&dyn Lookup) -> Result<(), BoxError> + Send + 'static,
    {
        AppOption::Invoke(vec![Invocation::new(name, f)])
    }

    pub fn hook(hook: Arc<dyn Hook>) -> Self {
        AppOption::Hook(vec![hook])
    }

    pub fn error_hook(handler: impl ErrorHandler + 'static) -> Self {
        AppOption::ErrorHook(vec![Arc::new(handler)])
    }

    pub fn error(err: impl Into<BoxError>) -> Self {
        AppOption::Error(vec![Error::registered(err)])
    }

    pub fn logger(logger: impl Logger + 'static) -> Self {
        AppOption::Logger(Arc::new(logger))
    }

    pub fn options(options: Vec<AppOption>) -> Self {
        AppOption::Options(options)
    }

    pub fn module(name: impl Into<String>, options: Vec<AppOption>) -> Self {
        AppOption::Module {
            name: name.into(),
            options,
        }
    }
}

impl fmt::Debug for AppOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppOption::Provide(cs) => {
                let names: Vec<&str> = cs.iter().map(|c| c.name()).collect();
                write!(f, "Provide({})", names.join(", "))
            }
            AppOption::Decorate(ds) => {
                let names: Vec<&str> = ds.iter().map(|d| d.name()).collect();
                write!(f, "Decorate({})", names.join(", "))
            }
            AppOption::Invoke(is) => {
                let names: Vec<&str> = is.iter().map(|i| i.name()).collect();
                write!(f, "Invoke({})", names.join(", "))
            }
            AppOption::Hook(hs) => {
                let names: Vec<&str> = hs.iter().map(|h| h.name()).collect();
                write!(f, "Hook({})", names.join(", "))
            }
            AppOption::ErrorHook(hs) => write!(f, "ErrorHook({} handlers)", hs.len()),
            AppOption::StartTimeout(d) => write!(f, "StartTimeout({:?})", d),
            AppOption::StopTimeout(d) => write!(f, "StopTimeout({:?})", d),
            AppOption::Config(c) => write!(f, "Config({:?})", c),
            AppOption::Logger(_) => f.write_str("Logger"),
            AppOption::SignalHub(_) => f.write_str("SignalHub"),
            AppOption::Error(es) => write!(f, "Error({} errors)", es.len()),
            AppOption::Options(os) => f.debug_tuple("Options").field(os).finish(),
            AppOption::Module { name, options } => {
                f.debug_tuple("Module").field(name).field(options).finish()
            }
        }
    }
}

/// Process-wide settings, owned by the root only.
pub(crate) struct RootSettings {
    pub(crate) invokes: Vec<Invocation>,
    pub(crate) error_hooks: Vec<Arc<dyn ErrorHandler>>,
    pub(crate) start_timeout: Duration,
    pub(crate) stop_timeout: Duration,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) hub: Option<Arc<SignalHub>>,
    pub(crate) err: Option<Error>,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            invokes: Vec::new(),
            error_hooks: Vec::new(),
            start_timeout: DEFAULT_TIMEOUT,
            stop_timeout: DEFAULT_TIMEOUT,
            logger: Arc::new(LogLogger),
            hub: None,
            err: None,
        }
    }
}

impl RootSettings {
    pub(crate) fn record_error(&mut self, err: Error) {
        self.err = Some(match self.err.take() {
            Some(prev) => prev.append(err),
            None => err,
        });
    }
}

/// Applies `option`, declared in `scope`, according to the routing table.
pub(crate) fn apply(option: AppOption, scope: ScopeId, tree: &mut ScopeTree, root: &mut RootSettings) {
    let route = option.kind().route();
    let target = match route {
        Route::Root => ScopeId::ROOT,
        Route::Scope | Route::Members => scope,
    };
    log::trace!("applying {:?} from {} to {}", option, tree.path(scope), tree.path(target));

    match option {
        AppOption::Options(members) => {
            for member in members {
                apply(member, scope, tree, root);
            }
        }
        AppOption::Module { name, options } => {
            let child = tree.add_child(target, name);
            for member in options {
                apply(member, child, tree, root);
            }
        }
        AppOption::Provide(constructors) => {
            if let Some(record) = tree.get_mut(target) {
                record.constructors.extend(constructors);
            }
        }
        AppOption::Decorate(decorators) => {
            if let Some(record) = tree.get_mut(target) {
                record.decorators.extend(decorators);
            }
        }
        AppOption::Hook(hooks) => {
            if let Some(record) = tree.get_mut(target) {
                record.hooks.extend(hooks);
            }
        }
        AppOption::Invoke(invokes) => root.invokes.extend(invokes),
        AppOption::ErrorHook(handlers) => root.error_hooks.extend(handlers),
        AppOption::StartTimeout(d) => root.start_timeout = d,
        AppOption::StopTimeout(d) => root.stop_timeout = d,
        AppOption::Config(cfg) => match cfg.validate() {
            Ok(()) => {
                root.start_timeout = cfg.start_timeout();
                root.stop_timeout = cfg.stop_timeout();
            }
            Err(err) => root.record_error(err),
        },
        AppOption::Logger(logger) => root.logger = logger,
        AppOption::SignalHub(hub) => root.hub = Some(hub),
        AppOption::Error(errors) => {
            if let Some(err) = Error::combine(errors) {
                root.record_error(err);
            }
        }
    }
}
