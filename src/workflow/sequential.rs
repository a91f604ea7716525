//! Ordered, fail-fast execution over a fixed list of children

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Sequential#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Reports a child as SKIPPED to listeners without invoking it, used for
/// every child still unreached once an earlier sibling has failed.
fn report_skipped(child: &dyn Workflow, ctx: &Context) {
    let started_at = Utc::now();
    ctx.listeners().notify_start(child.name(), ctx);
    ctx.listeners().notify_success(child.name(), ctx, &WorkflowResult::skipped(started_at));
}

/// Runs children in order against the same context, stopping at the first
/// failure. An empty child list succeeds without doing anything.
pub struct Sequential {
    name: String,
    children: Vec<Arc<dyn Workflow>>,
}

impl Sequential {
    pub fn new(children: Vec<Arc<dyn Workflow>>) -> Self {
        Self {
            name: default_name(),
            children,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Workflow for Sequential {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            for (index, child) in self.children.iter().enumerate() {
                let result = child.execute(ctx).await;
                if result.is_failed() {
                    for later in &self.children[index + 1..] {
                        report_skipped(later.as_ref(), ctx);
                    }
                    propagate(result)?;
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
        self.children.iter().map(|c| c.as_ref()).collect()
    }
}
