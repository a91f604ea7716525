//! Bounds the wall-clock duration of a wrapped workflow

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::executor::{Executor, TokioExecutor};
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Timeout#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Runs `inner` on the configured executor and races it against `timeout`.
/// On expiry, the in-flight unit is cancelled (best-effort) and the
/// composite fails with a timeout error; whatever the inner already wrote
/// to the shared context remains observable, not rolled back.
pub struct Timeout<E: Executor = TokioExecutor> {
    name: String,
    inner: Arc<dyn Workflow>,
    timeout: Duration,
    executor: E,
}

impl Timeout<TokioExecutor> {
    pub fn new(inner: Arc<dyn Workflow>, timeout: Duration) -> Self {
        Self { name: default_name(), inner, timeout, executor: TokioExecutor }
    }
}

impl<E: Executor> Timeout<E> {
    pub fn with_executor(inner: Arc<dyn Workflow>, timeout: Duration, executor: E) -> Self {
        Self { name: default_name(), inner, timeout, executor }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<E: Executor> Workflow for Timeout<E> {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            let inner = self.inner.clone();
            let ctx = ctx.clone();
            let handle = self.executor.spawn(async move { inner.execute(&ctx).await });
            let abort_handle = handle.abort_handle();

            match tokio::time::timeout(self.timeout, handle).await {
                Ok(Ok(result)) => propagate(result),
                Ok(Err(join_err)) => Err(EngineError::interrupted(format!("inner workflow panicked: {join_err}"))),
                Err(_elapsed) => {
                    abort_handle.abort();
                    Err(EngineError::timeout(name.clone()))
                }
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
