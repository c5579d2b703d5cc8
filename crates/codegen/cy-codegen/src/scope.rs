//! Lexical scopes used while lowering a function body

use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;

/// Handle of one scope in a [`ScopeTree`]
pub type ScopeId<V> = Idx<ScopeData<V>>;

/// One level of bindings
#[derive(Debug, Clone)]
pub struct ScopeData<V> {
    /// Enclosing scope (None for the function's root scope)
    pub parent: Option<ScopeId<V>>,
    records: FxHashMap<String, V>,
}

/// All scopes of one function; parents are referenced by index, never owned
#[derive(Debug)]
pub struct ScopeTree<V> {
    scopes: Arena<ScopeData<V>>,
}

impl<V> Default for ScopeTree<V> {
    fn default() -> Self {
        Self {
            scopes: Arena::new(),
        }
    }
}

impl<V: Clone> ScopeTree<V> {
    /// A tree with no scopes
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a scope with no parent
    pub fn create_root(&mut self) -> ScopeId<V> {
        self.scopes.alloc(ScopeData {
            parent: None,
            records: FxHashMap::default(),
        })
    }

    /// Allocate a scope nested in `parent`
    pub fn create_child(&mut self, parent: ScopeId<V>) -> ScopeId<V> {
        self.scopes.alloc(ScopeData {
            parent: Some(parent),
            records: FxHashMap::default(),
        })
    }

    /// Enclosing scope of `scope`
    pub fn parent(&self, scope: ScopeId<V>) -> Option<ScopeId<V>> {
        self.scopes[scope].parent
    }

    /// Look `name` up in `scope`, then in each enclosing scope
    pub fn get(&self, scope: ScopeId<V>, name: &str) -> Option<&V> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id];
            if let Some(value) = data.records.get(name) {
                return Some(value);
            }
            current = data.parent;
        }
        None
    }

    /// Bind `name` in `scope` only, replacing an existing binding there
    pub fn set(&mut self, scope: ScopeId<V>, name: impl Into<String>, value: V) {
        self.scopes[scope].records.insert(name.into(), value);
    }

    /// Whether `name` is bound at this level, ignoring parents
    pub fn contains_local(&self, scope: ScopeId<V>, name: &str) -> bool {
        self.scopes[scope].records.contains_key(name)
    }

    /// A new scope with the same parent and a copy of the bindings
    ///
    /// Later `set` calls on either scope do not affect the other.
    pub fn clone_scope(&mut self, scope: ScopeId<V>) -> ScopeId<V> {
        let copy = self.scopes[scope].clone();
        self.scopes.alloc(copy)
    }
}
