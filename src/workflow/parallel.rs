//! Runs children concurrently, optionally sharing context and cancelling on first failure

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};

use super::{with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::executor::{Executor, TokioExecutor};
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Parallel#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Spawns every child on the configured executor and waits for all of them.
///
/// Children complete in whatever real-time order the executor schedules
/// them, but failures are reported in submission order regardless: the
/// reported cause is always the first-submitted child that failed, with the
/// rest collected as `suppressed`. `fail_fast` defaults to `false` (wait for
/// every child, aggregate all failures); when explicitly set, every
/// still-running child is aborted as soon as any child fails and the
/// composite returns without waiting for the abort to land. When
/// `share_context` is false, each child gets its own detached copy of the
/// context so children cannot observe one another's writes.
pub struct Parallel<E: Executor = TokioExecutor> {
    name: String,
    children: Vec<Arc<dyn Workflow>>,
    fail_fast: bool,
    share_context: bool,
    executor: E,
}

impl Parallel<TokioExecutor> {
    pub fn new(children: Vec<Arc<dyn Workflow>>) -> Self {
        Self {
            name: default_name(),
            children,
            fail_fast: false,
            share_context: true,
            executor: TokioExecutor,
        }
    }
}

impl<E: Executor> Parallel<E> {
    pub fn with_executor(children: Vec<Arc<dyn Workflow>>, executor: E) -> Self {
        Self {
            name: default_name(),
            children,
            fail_fast: false,
            share_context: true,
            executor,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_shared_context(mut self, share_context: bool) -> Self {
        self.share_context = share_context;
        self
    }
}

#[async_trait]
impl<E: Executor> Workflow for Parallel<E> {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            if self.children.is_empty() {
                return Ok(Outcome::Success);
            }

            let mut outcomes: Vec<Option<EngineError>> = vec![None; self.children.len()];
            let mut futs = FuturesUnordered::new();
            let mut abort_handles = Vec::with_capacity(self.children.len());

            for (index, child) in self.children.iter().cloned().enumerate() {
                let child_ctx = if self.share_context { ctx.clone() } else { ctx.copy() };
                let handle = self.executor.spawn(async move { child.execute(&child_ctx).await });
                abort_handles.push(handle.abort_handle());
                futs.push(async move { (index, handle.await) });
            }

            let mut failed_fast = false;
            while let Some((index, joined)) = futs.next().await {
                match joined {
                    Ok(result) => outcomes[index] = result.error,
                    Err(join_err) if join_err.is_cancelled() => {}
                    Err(join_err) => {
                        outcomes[index] = Some(EngineError::interrupted(format!(
                            "child panicked: {join_err}"
                        )))
                    }
                }

                if self.fail_fast && outcomes[index].is_some() && !failed_fast {
                    failed_fast = true;
                    for (other, handle) in abort_handles.iter().enumerate() {
                        if other != index {
                            handle.abort();
                        }
                    }
                }
            }

            let mut errors = outcomes.into_iter().flatten();
            match errors.next() {
                None => Ok(Outcome::Success),
                Some(cause) => Err(EngineError::ParallelFailures {
                    cause: Box::new(cause),
                    suppressed: errors.collect(),
                }),
            }
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<&dyn Workflow> {
        self.children.iter().map(|c| c.as_ref()).collect()
    }
}
