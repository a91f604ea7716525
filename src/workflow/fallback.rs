//! Primary, then fallback on failure

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Fallback#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Runs `primary`; if it fails, runs `fallback` and returns its outcome
/// instead. The fallback sees whatever context mutations the primary made
/// before failing — nothing is rolled back.
pub struct Fallback {
    name: String,
    primary: Arc<dyn Workflow>,
    fallback: Arc<dyn Workflow>,
}

impl Fallback {
    pub fn new(primary: Arc<dyn Workflow>, fallback: Arc<dyn Workflow>) -> Self {
        Self {
            name: default_name(),
            primary,
            fallback,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Workflow for Fallback {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            let primary_result = self.primary.execute(ctx).await;
            if primary_result.is_failed() {
                propagate(self.fallback.execute(ctx).await)
            } else {
                Ok(Outcome::Success)
            }
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<&dyn Workflow> {
        vec![self.primary.as_ref(), self.fallback.as_ref()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::result::WorkflowStatus;
    use std::sync::atomic::AtomicUsize;

    struct Scripted {
        name: String,
        hits: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Workflow for Scripted {
        async fn execute(&self, ctx: &Context) -> WorkflowResult {
            super::with_lifecycle(&self.name, ctx, async {
                self.hits.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    Err(EngineError::composition("primary failed"))
                } else {
                    Ok(Outcome::Success)
                }
            })
            .await
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[tokio::test]
    async fn successful_primary_skips_fallback() {
        let primary_hits = Arc::new(AtomicUsize::new(0));
        let fallback_hits = Arc::new(AtomicUsize::new(0));

        let wf = Fallback::new(
            Arc::new(Scripted { name: "p".into(), hits: primary_hits.clone(), fail: false }),
            Arc::new(Scripted { name: "f".into(), hits: fallback_hits.clone(), fail: false }),
        );

        let result = wf.execute(&Context::new()).await;

        assert_eq!(result.status, WorkflowStatus::Success);
        assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_primary_falls_through_to_fallback() {
        let primary_hits = Arc::new(AtomicUsize::new(0));
        let fallback_hits = Arc::new(AtomicUsize::new(0));

        let wf = Fallback::new(
            Arc::new(Scripted { name: "p".into(), hits: primary_hits.clone(), fail: true }),
            Arc::new(Scripted { name: "f".into(), hits: fallback_hits.clone(), fail: false }),
        );

        let result = wf.execute(&Context::new()).await;

        assert_eq!(result.status, WorkflowStatus::Success);
        assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_hits.load(Ordering::SeqCst), 1);
    }
}
