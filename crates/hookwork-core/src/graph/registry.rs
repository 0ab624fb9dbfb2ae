use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::{Constructor, Decorator, Instance, Invocation, Lookup, Resolver};
use crate::kernel::error::{BoxError, Error, Result};
use crate::scope::{ScopeId, ScopeTree};

#[derive(Debug, Default)]
struct GraphScope {
    name: String,
    parent: Option<ScopeId>,
    instances: HashMap<TypeId, Instance>,
}

/// Per-scope registry of shared instances, keyed by concrete type.
///
/// A lookup from a scope sees its own instances first, then its ancestors'.
/// Parents never see what a child provides.
#[derive(Debug)]
pub struct Graph {
    scopes: HashMap<ScopeId, GraphScope>,
}

impl Graph {
    pub fn new() -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(
            ScopeId::ROOT,
            GraphScope {
                name: ScopeTree::ROOT_NAME.to_string(),
                ..GraphScope::default()
            },
        );
        Self { scopes }
    }

    /// Stores `instance` in `scope`, replacing any previous instance of `T`.
    pub fn register_instance<T: Any + Send + Sync>(&mut self, scope: ScopeId, instance: Arc<T>) {
        if let Some(s) = self.scopes.get_mut(&scope) {
            s.instances.insert(TypeId::of::<T>(), instance);
        }
    }

    /// Gets the instance of `T` visible from `scope`.
    pub fn get_concrete<T: Any + Send + Sync>(&self, scope: ScopeId) -> Option<Arc<T>> {
        self.find(scope, TypeId::of::<T>())
            .and_then(|instance| Arc::downcast::<T>(instance).ok())
    }

    fn find(&self, scope: ScopeId, type_id: TypeId) -> Option<Instance> {
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            let s = self.scopes.get(&id)?;
            if let Some(instance) = s.instances.get(&type_id) {
                return Some(Arc::clone(instance));
            }
            cursor = s.parent;
        }
        None
    }

    fn path(&self, scope: ScopeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(scope);
        while let Some(id) = cursor {
            match self.scopes.get(&id) {
                Some(s) => {
                    names.push(s.name.as_str());
                    cursor = s.parent;
                }
                None => break,
            }
        }
        names.reverse();
        names.join("/")
    }

    fn view(&self, scope: ScopeId) -> ScopeView<'_> {
        ScopeView { graph: self, scope }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

struct ScopeView<'a> {
    graph: &'a Graph,
    scope: ScopeId,
}

impl Lookup for ScopeView<'_> {
    fn lookup(&self, type_id: TypeId) -> Option<Instance> {
        self.graph.find(self.scope, type_id)
    }

    fn scope_path(&self) -> String {
        self.graph.path(self.scope)
    }
}

impl Resolver for Graph {
    fn add_scope(&mut self, id: ScopeId, parent: ScopeId, name: &str) {
        self.scopes.entry(id).or_insert_with(|| GraphScope {
            name: name.to_string(),
            parent: Some(parent),
            instances: HashMap::new(),
        });
    }

    fn provide(&mut self, scope: ScopeId, constructor: Constructor) -> Result<()> {
        let name = constructor.name().to_string();
        let type_id = constructor.type_id();
        let type_name = constructor.type_name();

        let already = self
            .scopes
            .get(&scope)
            .is_some_and(|s| s.instances.contains_key(&type_id));
        if already {
            return Err(Error::Provide {
                name,
                scope: self.path(scope),
                source: Arc::from(BoxError::from(format!("type {} already provided", type_name))),
            });
        }

        let instance = constructor.build(&self.view(scope)).map_err(|source| Error::Provide {
            name: name.clone(),
            scope: self.path(scope),
            source: Arc::from(source),
        })?;

        match self.scopes.get_mut(&scope) {
            Some(s) => {
                s.instances.insert(type_id, instance);
                Ok(())
            }
            None => Err(Error::Provide {
                name,
                scope: scope.to_string(),
                source: Arc::from(BoxError::from("unknown scope")),
            }),
        }
    }

    fn decorate(&mut self, scope: ScopeId, decorator: Decorator) -> Result<()> {
        let name = decorator.name().to_string();
        let type_id = decorator.type_id();

        let Some(current) = self.find(scope, type_id) else {
            return Err(Error::Decorate {
                name,
                scope: self.path(scope),
                source: Arc::from(BoxError::from(format!(
                    "type {} is not provided",
                    decorator.type_name()
                ))),
            });
        };

        let decorated = decorator
            .decorate(current, &self.view(scope))
            .map_err(|source| Error::Decorate {
                name: name.clone(),
                scope: self.path(scope),
                source: Arc::from(source),
            })?;

        match self.scopes.get_mut(&scope) {
            Some(s) => {
                s.instances.insert(type_id, decorated);
                Ok(())
            }
            None => Err(Error::Decorate {
                name,
                scope: scope.to_string(),
                source: Arc::from(BoxError::from("unknown scope")),
            }),
        }
    }

    fn invoke(&mut self, invocation: Invocation) -> Result<()> {
        let name = invocation.name().to_string();
        invocation
            .call(&self.view(ScopeId::ROOT))
            .map_err(|source| Error::Invoke {
                name,
                source: Arc::from(source),
            })
    }
}
