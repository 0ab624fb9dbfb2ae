//! # Hookwork Object Graph
//!
//! The seam between the orchestrator and whatever builds the application's
//! object graph. The orchestrator hands [`Constructor`]s, [`Decorator`]s and
//! [`Invocation`]s to a [`Resolver`] and only looks at whether they succeeded.
//!
//! [`Graph`] is the bundled resolver: a per-scope registry of shared instances
//! keyed by type. It runs constructors eagerly in the order they are provided
//! and does no parameter matching; anything smarter belongs in a custom
//! [`Resolver`].
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::kernel::error::{BoxError, Error, Result};
use crate::scope::ScopeId;

pub mod registry;

pub use registry::Graph;

/// A shared, type-erased instance stored in the graph.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Read access to the instances visible from one scope.
pub trait Lookup {
    fn lookup(&self, type_id: TypeId) -> Option<Instance>;

    /// Path of the scope lookups are made from, for error messages.
    fn scope_path(&self) -> String;
}

impl dyn Lookup + '_ {
    /// Fetches the instance of `T` visible from this scope.
    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.lookup(TypeId::of::<T>())
            .and_then(|instance| Arc::downcast::<T>(instance).ok())
            .ok_or_else(|| Error::MissingType {
                type_name: type_name::<T>(),
                scope: self.scope_path(),
            })
    }
}

/// Something that can register constructors and run invocations.
pub trait Resolver: Send {
    /// Declares a child scope. Called before anything is provided into it.
    fn add_scope(&mut self, id: ScopeId, parent: ScopeId, name: &str);

    fn provide(&mut self, scope: ScopeId, constructor: Constructor) -> Result<()>;

    /// Replaces the instance visible from `scope` with a decorated one.
    ///
    /// The replacement is seen by `scope` and its descendants; ancestors keep
    /// the original.
    fn decorate(&mut self, scope: ScopeId, decorator: Decorator) -> Result<()>;

    /// Runs an invocation against the root scope.
    fn invoke(&mut self, invocation: Invocation) -> Result<()>;
}

type BuildFn = Box<dyn FnOnce(&dyn Lookup) -> std::result::Result<Instance, BoxError> + Send>;
type DecorateFn =
    Box<dyn FnOnce(Instance, &dyn Lookup) -> std::result::Result<Instance, BoxError> + Send>;
type CallFn = Box<dyn FnOnce(&dyn Lookup) -> std::result::Result<(), BoxError> + Send>;

/// Teaches the graph how to produce one type.
pub struct Constructor {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    build: BuildFn,
}

impl Constructor {
    pub fn new<T, F>(name: impl Into<String>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(&dyn Lookup) -> std::result::Result<T, BoxError> + Send + 'static,
    {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            build: Box::new(move |lookup| f(lookup).map(|value| Arc::new(value) as Instance)),
        }
    }

    /// Supplies an already built value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::new(format!("supply({})", type_name::<T>()), move |_| Ok(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn build(self, lookup: &dyn Lookup) -> std::result::Result<Instance, BoxError> {
        (self.build)(lookup)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Wraps or replaces an instance that is already in the graph.
pub struct Decorator {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    decorate: DecorateFn,
}

impl Decorator {
    /// `f` receives the instance of `T` currently visible and returns the one
    /// that takes its place.
    pub fn new<T, F>(name: impl Into<String>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(Arc<T>, &dyn Lookup) -> std::result::Result<T, BoxError> + Send + 'static,
    {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            decorate: Box::new(move |current, lookup| {
                let current = Arc::downcast::<T>(current).map_err(|_| {
                    BoxError::from(format!("instance is not a {}", type_name::<T>()))
                })?;
                f(current, lookup).map(|value| Arc::new(value) as Instance)
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn decorate(
        self,
        current: Instance,
        lookup: &dyn Lookup,
    ) -> std::result::Result<Instance, BoxError> {
        (self.decorate)(current, lookup)
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A function executed once, eagerly, against the resolved graph.
pub struct Invocation {
    name: String,
    call: CallFn,
}

impl Invocation {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(&dyn Lookup) -> std::result::Result<(), BoxError> + Send + 'static,
    {
        Self {
            name: name.into(),
            call: Box::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(self, lookup: &dyn Lookup) -> std::result::Result<(), BoxError> {
        (self.call)(lookup)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
