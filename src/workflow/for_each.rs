//! Iterates a context-held collection, running a wrapped workflow per item

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("ForEach#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Reads a `Vec<T>` out of the context under `items_key` and runs `inner`
/// once per element, writing the element under `item_var` (and, if set, the
/// zero-based index under `index_var`) before each run. Fails fast on the
/// first failing element. A missing or wrong-typed `items_key` is treated
/// as an empty collection and the composite succeeds trivially.
pub struct ForEach<T: Clone + Send + Sync + 'static> {
    name: String,
    inner: Arc<dyn Workflow>,
    items_key: String,
    item_var: String,
    index_var: Option<String>,
    _marker: PhantomData<T>,
}

impl<T: Clone + Send + Sync + 'static> ForEach<T> {
    pub fn new(inner: Arc<dyn Workflow>, items_key: impl Into<String>, item_var: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            inner,
            items_key: items_key.into(),
            item_var: item_var.into(),
            index_var: None,
            _marker: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_index_var(mut self, key: impl Into<String>) -> Self {
        self.index_var = Some(key.into());
        self
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Workflow for ForEach<T> {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            let items: Vec<T> = ctx.get(&self.items_key).unwrap_or_default();

            for (index, item) in items.into_iter().enumerate() {
                ctx.put(&self.item_var, item);
                if let Some(key) = &self.index_var {
                    ctx.put(key, index as u64);
                }
                let result = self.inner.execute(ctx).await;
                if result.is_failed() {
                    return propagate(result);
                }
            }
            Ok(Outcome::Success)
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<&dyn Workflow> {
        vec![self.inner.as_ref()]
    }
}
