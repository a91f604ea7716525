//! Two-way predicate branch

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Conditional#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

type Predicate = dyn Fn(&Context) -> Result<bool, String> + Send + Sync;

/// Evaluates `predicate` exactly once and invokes only the selected branch.
/// A false predicate with no `when_false` branch succeeds without doing
/// anything.
pub struct Conditional {
    name: String,
    predicate: Arc<Predicate>,
    when_true: Arc<dyn Workflow>,
    when_false: Option<Arc<dyn Workflow>>,
}

impl Conditional {
    pub fn new(
        predicate: impl Fn(&Context) -> Result<bool, String> + Send + Sync + 'static,
        when_true: Arc<dyn Workflow>,
    ) -> Self {
        Self {
            name: default_name(),
            predicate: Arc::new(predicate),
            when_true,
            when_false: None,
        }
    }

    pub fn with_else(mut self, when_false: Arc<dyn Workflow>) -> Self {
        self.when_false = Some(when_false);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Workflow for Conditional {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            match (self.predicate)(ctx) {
                Err(message) => Err(EngineError::predicate(message)),
                Ok(true) => propagate(self.when_true.execute(ctx).await),
                Ok(false) => match &self.when_false {
                    Some(branch) => propagate(branch.execute(ctx).await),
                    None => Ok(Outcome::Success),
                },
            }
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<&dyn Workflow> {
        match &self.when_false {
            Some(branch) => vec![self.when_true.as_ref(), branch.as_ref()],
            None => vec![self.when_true.as_ref()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::WorkflowStatus;
    use crate::workflow::Sequential;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        name: String,
        hits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Workflow for Counter {
        async fn execute(&self, ctx: &Context) -> WorkflowResult {
            super::with_lifecycle(&self.name, ctx, async {
                self.hits.fetch_add(1, Ordering::SeqCst);
                Ok(Outcome::Success)
            })
            .await
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[tokio::test]
    async fn true_predicate_runs_when_true_only() {
        let true_hits = Arc::new(AtomicUsize::new(0));
        let false_hits = Arc::new(AtomicUsize::new(0));

        let cond = Conditional::new(
            |_| Ok(true),
            Arc::new(Counter { name: "t".into(), hits: true_hits.clone() }),
        )
        .with_else(Arc::new(Counter { name: "f".into(), hits: false_hits.clone() }));

        let result = cond.execute(&Context::new()).await;

        assert_eq!(result.status, WorkflowStatus::Success);
        assert_eq!(true_hits.load(Ordering::SeqCst), 1);
        assert_eq!(false_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn false_predicate_with_no_else_succeeds_without_invoking_anything() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cond = Conditional::new(|_| Ok(false), Arc::new(Counter { name: "t".into(), hits: hits.clone() }));

        let result = cond.execute(&Context::new()).await;

        assert_eq!(result.status, WorkflowStatus::Success);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn predicate_error_fails_the_workflow() {
        let cond: Conditional = Conditional::new(
            |_| Err("boom".to_string()),
            Arc::new(Sequential::new(vec![])),
        );
        let result = cond.execute(&Context::new()).await;
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert_eq!(result.error.unwrap().kind(), "predicate");
    }
}
