//! The composition algebra: one trait, ten composites, all sharing the same
//! start/success/failure lifecycle
//!
//! Every composite follows the same shape: capture `started_at`, notify
//! listeners, run a body that produces either an [`Outcome`] or an
//! [`EngineError`], then notify listeners again and fold the outcome into a
//! [`WorkflowResult`]. [`with_lifecycle`] is that shared plumbing; no
//! composite implements it by hand.

pub mod conditional;
pub mod fallback;
pub mod for_each;
pub mod parallel;
pub mod rate_limited;
pub mod repeat;
pub mod saga;
pub mod sequential;
pub mod switch;
pub mod task_workflow;
pub mod timeout;

pub use conditional::Conditional;
pub use fallback::Fallback;
pub use for_each::ForEach;
pub use parallel::Parallel;
pub use rate_limited::RateLimited;
pub use repeat::Repeat;
pub use saga::{Saga, SagaBuilder, SagaStep, SAGA_FAILED_STEP, SAGA_FAILURE_CAUSE};
pub use sequential::Sequential;
pub use switch::{Switch, SwitchBuilder};
pub use task_workflow::TaskWorkflow;
pub use timeout::Timeout;

use std::future::Future;

use async_trait::async_trait;
use chrono::Utc;

use crate::context::Context;
use crate::error::EngineError;
use crate::result::{WorkflowResult, WorkflowStatus};

/// A composable unit that runs to produce a [`WorkflowResult`] and never
/// raises out of `execute`.
#[async_trait]
pub trait Workflow: Send + Sync {
    async fn execute(&self, ctx: &Context) -> WorkflowResult;

    fn name(&self) -> &str;

    /// Direct children, for tree traversal. Leaves (like [`TaskWorkflow`])
    /// leave this at the default, empty implementation.
    fn children(&self) -> Vec<&dyn Workflow> {
        Vec::new()
    }
}

/// What a composite's body produced, before lifecycle wrapping folds it
/// into a [`WorkflowResult`].
///
/// `Skipped` is for a composite's own top-level result (none currently
/// returns it — `Repeat(w, 0)` and empty `Sequential`/`Parallel` resolve to
/// `Success` per the idempotence laws). Per-child SKIPPED reporting, like
/// `Sequential`'s unreached children after a failure, is a separate listener
/// notification and does not go through this enum (see `sequential.rs`'s
/// `report_skipped`).
pub(crate) enum Outcome {
    Success,
    Skipped,
}

/// Fold a child's already-completed [`WorkflowResult`] back into this
/// composite's own body outcome: failures propagate as-is, anything else
/// reports success (a composite that merely delegates to one branch does
/// not itself report SKIPPED as its own status — see
/// [`crate::result::WorkflowStatus`]).
pub(crate) fn propagate(result: WorkflowResult) -> Result<Outcome, EngineError> {
    match result.status {
        WorkflowStatus::Failed => {
            Err(result.error.expect("a FAILED WorkflowResult always carries an error"))
        }
        WorkflowStatus::Success | WorkflowStatus::Skipped => Ok(Outcome::Success),
    }
}

/// Run `body`, wrapping it in the start/success/failure listener protocol
/// every workflow in the crate obeys.
pub(crate) async fn with_lifecycle<Fut>(name: &str, ctx: &Context, body: Fut) -> WorkflowResult
where
    Fut: Future<Output = Result<Outcome, EngineError>>,
{
    let started_at = Utc::now();
    ctx.listeners().notify_start(name, ctx);

    let result = match body.await {
        Ok(Outcome::Success) => WorkflowResult::success(started_at),
        Ok(Outcome::Skipped) => WorkflowResult::skipped(started_at),
        Err(error) => WorkflowResult::failed(started_at, error),
    };

    if let Some(error) = &result.error {
        ctx.listeners().notify_failure(name, ctx, error);
    } else {
        ctx.listeners().notify_success(name, ctx, &result);
    }

    result
}
