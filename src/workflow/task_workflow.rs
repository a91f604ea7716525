//! Adapts a single [`Task`] (via [`TaskDescriptor`]) into a [`Workflow`] leaf

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{with_lifecycle, Outcome, Workflow};
use crate::context::Context;
use crate::error::EngineError;
use crate::reliability::{Sleeper, SystemSleeper};
use crate::result::WorkflowResult;
use crate::task::{TaskDescriptor, TaskError};

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_name() -> String {
    format!("Task#{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

enum Attempt {
    Success,
    Failed(TaskError),
    TimedOut,
}

/// Wraps a [`TaskDescriptor`] as a leaf [`Workflow`].
///
/// Retry and timeout compose: the timeout policy, if any, bounds *each
/// attempt*, not the whole retry loop. A timed-out attempt is retried the
/// same way a failed attempt is, as long as attempts remain — it is not
/// run through [`RetryPolicy::should_retry`](crate::reliability::RetryPolicy::should_retry),
/// since that only discriminates on task-reported error kinds.
pub struct TaskWorkflow {
    name: String,
    descriptor: TaskDescriptor,
    sleeper: Arc<dyn Sleeper>,
}

impl TaskWorkflow {
    pub fn new(descriptor: TaskDescriptor) -> Self {
        Self {
            name: default_name(),
            descriptor,
            sleeper: Arc::new(SystemSleeper),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    async fn run_attempt(&self, ctx: &Context) -> Attempt {
        match &self.descriptor.timeout_policy {
            None => match self.descriptor.task.execute(ctx).await {
                Ok(()) => Attempt::Success,
                Err(err) => Attempt::Failed(err),
            },
            Some(policy) => {
                match tokio::time::timeout(policy.duration(), self.descriptor.task.execute(ctx)).await {
                    Ok(Ok(())) => Attempt::Success,
                    Ok(Err(err)) => Attempt::Failed(err),
                    Err(_elapsed) => Attempt::TimedOut,
                }
            }
        }
    }
}

#[async_trait]
impl Workflow for TaskWorkflow {
    async fn execute(&self, ctx: &Context) -> WorkflowResult {
        let name = self.name.clone();
        with_lifecycle(&name, ctx, async {
            let mut attempt: u32 = 1;
            loop {
                match self.run_attempt(ctx).await {
                    Attempt::Success => return Ok(Outcome::Success),
                    Attempt::Failed(err) => {
                        let retryable = self
                            .descriptor
                            .retry_policy
                            .as_ref()
                            .is_some_and(|p| p.should_retry(err.kind.as_deref()) && p.has_attempts_remaining(attempt));
                        if !retryable {
                            return Err(EngineError::Task(err));
                        }
                    }
                    Attempt::TimedOut => {
                        let retryable = self
                            .descriptor
                            .retry_policy
                            .as_ref()
                            .is_some_and(|p| p.has_attempts_remaining(attempt));
                        if !retryable {
                            return Err(EngineError::timeout(name.clone()));
                        }
                    }
                }
                let policy = self.descriptor.retry_policy.as_ref().expect("retryable implies a retry policy");
                let delay = policy.delay_for_attempt(attempt + 1);
                self.sleeper.sleep(delay).await;
                attempt += 1;
            }
        })
        .await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reliability::{RecordingSleeper, RetryPolicy, TimeoutPolicy};
    use crate::result::WorkflowStatus;
    use crate::task::Task;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct FlakyTask {
        fails_until: usize,
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Task for FlakyTask {
        async fn execute(&self, _ctx: &Context) -> Result<(), TaskError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.fails_until {
                Err(TaskError::new(format!("attempt {attempt} failed")))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn no_retry_fails_on_first_task_error() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let workflow = TaskWorkflow::new(TaskDescriptor::new(FlakyTask { fails_until: 1, attempts: attempts.clone() }));
        let result = workflow.execute(&Context::new()).await;
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success_and_records_exact_backoff_sequence() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let sleeper = Arc::new(RecordingSleeper::new());
        let policy = RetryPolicy::exponential()
            .with_max_attempts(3)
            .with_initial_interval(Duration::from_millis(100))
            .with_jitter(0.0);

        let workflow = TaskWorkflow::new(
            TaskDescriptor::new(FlakyTask { fails_until: 2, attempts: attempts.clone() }).with_retry(policy),
        )
        .with_sleeper(sleeper.clone());

        let result = workflow.execute(&Context::new()).await;

        assert_eq!(result.status, WorkflowStatus::Success);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(
            sleeper.requested(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    struct NeverEndingTask;

    #[async_trait]
    impl Task for NeverEndingTask {
        async fn execute(&self, _ctx: &Context) -> Result<(), TaskError> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[tokio::test]
    async fn per_attempt_timeout_fails_with_timeout_error() {
        let workflow = TaskWorkflow::new(
            TaskDescriptor::new(NeverEndingTask).with_timeout(TimeoutPolicy::of_millis(10)),
        );
        let result = workflow.execute(&Context::new()).await;
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert_eq!(result.error.unwrap().kind(), "timeout");
    }
}
