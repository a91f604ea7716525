//! Multi-way, case-insensitive branch selection

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{propagate, with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::{CompositionError, EngineError};
use crate::result::WorkflowResult;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Switch#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

type Selector = dyn Fn(&Context) -> Result<String, String> + Send + Sync;

/// Computes a selector key, looks it up case-insensitively among `branches`,
/// and invokes the match (or `default` if none matches). Branch keys are
/// normalised to lower-case on both insert and lookup.
pub struct Switch {
    name: String,
    selector: Arc<Selector>,
    branches: HashMap<String, Arc<dyn Workflow>>,
    default: Option<Arc<dyn Workflow>>,
}

impl Switch {
    pub fn builder(
        selector: impl Fn(&Context) -> Result<String, String> + Send + Sync + 'static,
    ) -> SwitchBuilder {
        SwitchBuilder {
            name: None,
            selector: Arc::new(selector),
            branches: HashMap::new(),
            default: None,
        }
    }
}

pub struct SwitchBuilder {
    name: Option<String>,
    selector: Arc<Selector>,
    branches: HashMap<String, Arc<dyn Workflow>>,
    default: Option<Arc<dyn Workflow>>,
}

impl SwitchBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn branch(mut self, key: impl Into<String>, workflow: Arc<dyn Workflow>) -> Self {
        self.branches.insert(key.into().to_lowercase(), workflow);
        self
    }

    pub fn default_branch(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.default = Some(workflow);
        self
    }

    pub fn build(self) -> Result<Switch, CompositionError> {
        if self.branches.is_empty() {
            return Err(CompositionError::new("switch must have at least one branch"));
        }
        Ok(Switch {
            name: self.name.unwrap_or_else(default_name),
            selector: self.selector,
            branches: self.branches,
            default: self.default,
        })
    }
}

#[async_trait]
impl Workflow for Switch {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            match (self.selector)(ctx) {
                Err(message) => Err(EngineError::selector(message)),
                Ok(key) => {
                    let key = key.to_lowercase();
                    match self.branches.get(&key).or(self.default.as_ref()) {
                        Some(branch) => propagate(branch.execute(ctx).await),
                        None => Err(EngineError::NoMatchingBranch { key }),
                    }
                }
            }
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<&dyn Workflow> {
        let mut children: Vec<&dyn Workflow> = self.branches.values().map(|w| w.as_ref()).collect();
        if let Some(default) = &self.default {
            children.push(default.as_ref());
        }
        children
    }
}
