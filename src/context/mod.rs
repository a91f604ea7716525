//! Thread-safe typed key-value store shared across a single `execute` call
//!
//! A [`Context`] is cheap to clone (it's an `Arc` handle) and safe to hand to
//! many worker threads at once, the way `everruns-durable`'s
//! `InMemoryWorkflowEventStore` guards its maps with `parking_lot` locks while
//! the outer handle stays `Clone`. Values are stored type-erased and
//! downcast on read; storing the wrong type back out behaves as "key
//! absent" for the default-valued accessors and as an error for the plain
//! ones, per spec.

mod listeners;
mod scope;
mod type_key;

pub use listeners::{WorkflowListener, WorkflowListeners};
pub use scope::ScopedContext;
pub use type_key::TypeKey;

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

type ErasedValue = Arc<dyn Any + Send + Sync>;

/// Error returned by the strict typed accessors ([`Context::try_get`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// No value stored under this key.
    #[error("key {0:?} not present in context")]
    Missing(String),

    /// A value is stored under this key, but not of the requested type.
    #[error("key {0:?} holds a value of a different type")]
    TypeMismatch(String),
}

/// The shared, thread-safe key-value store passed to every `Workflow::execute`.
#[derive(Clone)]
pub struct Context {
    store: Arc<DashMap<String, ErasedValue>>,
    listeners: WorkflowListeners,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new, empty context with a fresh listener registry.
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            listeners: WorkflowListeners::new(),
        }
    }

    /// Store a value under `key`, overwriting whatever was there.
    pub fn put<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.store.insert(key.into(), Arc::new(value));
    }

    /// Typed read. Returns `None` if the key is absent OR holds a different type.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        self.store
            .get(key)
            .and_then(|entry| entry.value().clone().downcast::<T>().ok())
            .map(|arc| (*arc).clone())
    }

    /// Typed read with a default, used when absence and type-mismatch should
    /// both fall back silently (per spec: "Default-valued typed access
    /// returns the default when the key is absent OR present-but-wrong-type").
    pub fn get_or<T: Clone + Send + Sync + 'static>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Typed read with a lazily-computed default.
    pub fn get_or_else<T: Clone + Send + Sync + 'static>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> T {
        self.get(key).unwrap_or_else(default)
    }

    /// Strict typed read: distinguishes "missing" from "wrong type".
    pub fn try_get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Result<T, ContextError> {
        match self.store.get(key) {
            None => Err(ContextError::Missing(key.to_string())),
            Some(entry) => entry
                .value()
                .clone()
                .downcast::<T>()
                .map(|arc| (*arc).clone())
                .map_err(|_| ContextError::TypeMismatch(key.to_string())),
        }
    }

    /// Read via a [`TypeKey`] instead of a bare string + turbofish. Preserves
    /// the key's element type the same way a generic-preserving accessor
    /// would in a language with type erasure — in Rust, `T` is simply part
    /// of `TypeKey<T>`'s own type, so this is mostly ergonomic sugar, but it
    /// keeps call sites from drifting the key and the type apart.
    pub fn get_typed<T: Clone + Send + Sync + 'static>(&self, key: &TypeKey<T>) -> Option<T> {
        self.get(key.name())
    }

    /// Write via a [`TypeKey`].
    pub fn put_typed<T: Send + Sync + 'static>(&self, key: &TypeKey<T>, value: T) {
        self.put(key.name(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    /// A scoped view over this context: `scope.put(k, v)` rekeys to
    /// `"{prefix}.{k}"`. Nested scopes compose by concatenation.
    pub fn scope(&self, prefix: impl Into<String>) -> ScopedContext {
        ScopedContext::new(self.clone(), prefix.into())
    }

    /// Shallow, detached copy: a new context whose map holds the same value
    /// references as of this call. Mutations made to either context after
    /// the copy (including key additions/removals) are not visible to the
    /// other. The listener registry is shared by reference; call
    /// [`Context::detach_listeners`] on the copy if independent listeners
    /// are required.
    pub fn copy(&self) -> Self {
        self.copy_filtered(|_| true)
    }

    /// Shallow, detached copy containing only entries whose key satisfies
    /// `predicate`.
    pub fn copy_filtered(&self, predicate: impl Fn(&str) -> bool) -> Self {
        let copied = DashMap::new();
        for entry in self.store.iter() {
            if predicate(entry.key()) {
                copied.insert(entry.key().clone(), entry.value().clone());
            }
        }
        Self {
            store: Arc::new(copied),
            listeners: self.listeners.clone(),
        }
    }

    /// Detach this context's listener registry into an independent, empty one.
    pub fn detach_listeners(&mut self) {
        self.listeners = WorkflowListeners::new();
    }

    /// The listener registry attached to this context.
    pub fn listeners(&self) -> &WorkflowListeners {
        &self.listeners
    }

    /// Number of entries currently stored. Mostly useful for tests.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
