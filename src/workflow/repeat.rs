//! Runs a wrapped workflow a fixed number of times

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Repeat#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Executes `inner` `times` times in sequence, failing fast on the first
/// failed iteration. If `index_var` is set, the zero-based iteration index
/// is written into the context under that key before each run. `times == 0`
/// succeeds trivially without invoking `inner`.
pub struct Repeat {
    name: String,
    inner: Arc<dyn Workflow>,
    times: u64,
    index_var: Option<String>,
}

impl Repeat {
    pub fn new(inner: Arc<dyn Workflow>, times: u64) -> Self {
        Self { name: default_name(), inner, times, index_var: None }
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
impl Workflow for Repeat {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            for index in 0..self.times {
                if let Some(key) = &self.index_var {
                    ctx.put(key, index);
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
