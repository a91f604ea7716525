//! Gates execution of a wrapped workflow on a shared rate limiter

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::ratelimit::RateLimitStrategy;
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("RateLimited#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Calls `limiter.acquire()` before invoking `inner`. The same limiter
/// instance may be shared across many `RateLimited` wrappers to enforce one
/// admission budget across all of them.
pub struct RateLimited {
    name: String,
    inner: Arc<dyn Workflow>,
    limiter: Arc<dyn RateLimitStrategy>,
}

impl RateLimited {
    pub fn new(inner: Arc<dyn Workflow>, limiter: Arc<dyn RateLimitStrategy>) -> Self {
        Self { name: default_name(), inner, limiter }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Workflow for RateLimited {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            match self.limiter.acquire().await {
                Ok(()) => propagate(self.inner.execute(ctx).await),
                Err(_) => Err(EngineError::RateLimitInterrupted),
            }
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
