//! # Hookwork Scopes
//!
//! The tree of configuration namespaces under one application.
//!
//! Scopes are kept in an arena owned by [`ScopeTree`]; records refer to each
//! other by [`ScopeId`]. A child keeps a back-reference to its parent and
//! never owns it. Only hook, constructor and decorator registrations live in
//! a scope: process-wide settings (invocations, error handlers, budgets,
//! logger) are routed to the application itself, see
//! [`OptionKind::route`](crate::kernel::option::OptionKind::route).
use std::fmt;
use std::sync::Arc;

use crate::graph::{Constructor, Decorator};
use crate::lifecycle::Hook;

/// Position of a scope inside its [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registrations collected for one scope.
pub struct ScopeRecord {
    name: String,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) decorators: Vec<Decorator>,
    pub(crate) hooks: Vec<Arc<dyn Hook>>,
}

impl ScopeRecord {
    fn new(name: String, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            constructors: Vec::new(),
            decorators: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Constructors not yet handed to the resolver.
    pub fn pending_constructors(&self) -> usize {
        self.constructors.len()
    }

    /// Decorators not yet handed to the resolver.
    pub fn pending_decorators(&self) -> usize {
        self.decorators.len()
    }

    /// Hooks not yet appended to the lifecycle.
    pub fn pending_hooks(&self) -> usize {
        self.hooks.len()
    }
}

impl fmt::Debug for ScopeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRecord")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("constructors", &self.constructors.len())
            .field("decorators", &self.decorators.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Root scope plus every descendant reachable from it.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<ScopeRecord>,
}

impl ScopeTree {
    pub const ROOT_NAME: &'static str = "root";

    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeRecord::new(Self::ROOT_NAME.to_string(), None)],
        }
    }

    /// Creates a named child under `parent`.
    ///
    /// # Panics
    /// If `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: ScopeId, name: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeRecord::new(name.into(), Some(parent)));
        self.scopes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&ScopeRecord> {
        self.scopes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ScopeId) -> Option<&mut ScopeRecord> {
        self.scopes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Scope ids in pre-order: a scope, then each child subtree in
    /// declaration order.
    pub fn depth_first(&self) -> Vec<ScopeId> {
        let mut order = Vec::with_capacity(self.scopes.len());
        let mut stack = vec![ScopeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.scopes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Slash-separated names from the root down to `id`, e.g. `root/http/admin`.
    pub fn path(&self, id: ScopeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.scopes.get(current.0) {
                Some(record) => {
                    names.push(record.name.as_str());
                    cursor = record.parent;
                }
                None => break,
            }
        }
        names.reverse();
        names.join("/")
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
