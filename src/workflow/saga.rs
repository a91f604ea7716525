//! Forward execution with backward compensation

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::{CompositionError, EngineError};
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Saga#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Context key set to the original forward failure before compensation runs.
pub const SAGA_FAILURE_CAUSE: &str = "SAGA_FAILURE_CAUSE";
/// Context key set to the name of the step that failed forward execution.
pub const SAGA_FAILED_STEP: &str = "SAGA_FAILED_STEP";

/// One step of a [`Saga`]: an action, and an optional compensation run only
/// if the action succeeded and a later step fails.
pub struct SagaStep {
    pub name: String,
    pub action: Arc<dyn Workflow>,
    pub compensation: Option<Arc<dyn Workflow>>,
}

/// Runs `steps` forward in order. If a step fails, every previously
/// successful step that declared a compensation is compensated in reverse
/// order; compensation failures are collected but never stop the rest of
/// the rollback.
pub struct Saga {
    name: String,
    steps: Vec<SagaStep>,
}

impl Saga {
    pub fn builder() -> SagaBuilder {
        SagaBuilder { name: None, steps: Vec::new() }
    }
}

pub struct SagaBuilder {
    name: Option<String>,
    steps: Vec<SagaStep>,
}

impl SagaBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn step(
        mut self,
        name: impl Into<String>,
        action: Arc<dyn Workflow>,
        compensation: Option<Arc<dyn Workflow>>,
    ) -> Self {
        self.steps.push(SagaStep { name: name.into(), action, compensation });
        self
    }

    pub fn build(self) -> Result<Saga, CompositionError> {
        if self.steps.is_empty() {
            return Err(CompositionError::new("saga must have at least one step"));
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.name.clone()) {
                return Err(CompositionError::new(format!(
                    "duplicate saga step name {:?}",
                    step.name
                )));
            }
        }
        Ok(Saga { name: self.name.unwrap_or_else(default_name), steps: self.steps })
    }
}

#[async_trait]
impl Workflow for Saga {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            let mut compensations: Vec<(&str, &Arc<dyn Workflow>)> = Vec::new();

            for step in &self.steps {
                let result = step.action.execute(ctx).await;
                if result.is_failed() {
                    let cause = result.error.expect("FAILED result carries an error");
                    ctx.put(SAGA_FAILURE_CAUSE, cause.clone());
                    ctx.put(SAGA_FAILED_STEP, step.name.clone());

                    let mut suppressed = Vec::new();
                    for (_, compensation) in compensations.into_iter().rev() {
                        let comp_result = compensation.execute(ctx).await;
                        if let Some(error) = comp_result.error {
                            suppressed.push(error);
                        }
                    }

                    return Err(EngineError::SagaCompensation { cause: Box::new(cause), suppressed });
                }

                if let Some(compensation) = &step.compensation {
                    compensations.push((step.name.as_str(), compensation));
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
        self.steps.iter().map(|s| s.action.as_ref()).collect()
    }
}
