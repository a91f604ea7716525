//! Typed keys: a named, statically-typed handle into a [`Context`](super::Context)

use std::marker::PhantomData;

/// A named key carrying the type of the value it points to.
///
/// Plain string keys work fine with [`Context::get`](super::Context::get),
/// but a `TypeKey<T>` lets a module define its context keys once, alongside
/// the type they hold, instead of repeating the turbofish at every call site.
pub struct TypeKey<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypeKey<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for TypeKey<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TypeKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeKey").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_preserved() {
        let key: TypeKey<i64> = TypeKey::new("counter");
        assert_eq!(key.name(), "counter");
    }
}
