//! Scoped views over a [`Context`]

use super::Context;

/// A named-prefix view over a [`Context`].
///
/// `scope.put(k, v)` / `scope.get(k)` rekey transparently to
/// `"{prefix}.{k}"` on the underlying context. Scopes are views, not
/// copies: writes through a scope are immediately visible to the parent
/// context and to any other scope sharing the same prefix.
#[derive(Clone)]
pub struct ScopedContext {
    inner: Context,
    prefix: String,
}

impl ScopedContext {
    pub(super) fn new(inner: Context, prefix: String) -> Self {
        Self { inner, prefix }
    }

    fn rekey(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    pub fn put<T: Send + Sync + 'static>(&self, key: &str, value: T) {
        self.inner.put(self.rekey(key), value);
    }

    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        self.inner.get(&self.rekey(key))
    }

    pub fn get_or<T: Clone + Send + Sync + 'static>(&self, key: &str, default: T) -> T {
        self.inner.get_or(&self.rekey(key), default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(&self.rekey(key))
    }

    /// A nested scope; prefixes compose by concatenation
    /// (`"outer.inner"`), not by further prefixing each key independently.
    pub fn scope(&self, prefix: &str) -> ScopedContext {
        ScopedContext::new(self.inner.clone(), format!("{}.{}", self.prefix, prefix))
    }

    /// Escape hatch back to the underlying, unscoped context.
    pub fn context(&self) -> &Context {
        &self.inner
    }
}
