//! The `Task` trait: the opaque leaf unit of work the engine schedules
//!
//! Tasks are externally supplied. The engine never inspects their internals;
//! it only knows how to invoke one, retry it, time it out, and map its
//! failure into the shared [`EngineError`](crate::error::EngineError) taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::reliability::{RetryPolicy, TimeoutPolicy};

/// Error reported by a [`Task`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskError {
    /// Human-readable message.
    pub message: String,

    /// Optional error kind, used for retry allow/deny lists
    /// (see [`RetryPolicy::with_non_retryable_kind`]).
    pub kind: Option<String>,
}

impl TaskError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskError {}

/// A single, opaque unit of work.
///
/// `execute` takes no return value on success and fails with a [`TaskError`]
/// on failure. Tasks are supplied by the host application; the engine only
/// decorates them with retry/timeout policy via [`TaskDescriptor`].
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Run the task against the shared context.
    async fn execute(&self, ctx: &Context) -> Result<(), TaskError>;
}

/// A task decorated with optional retry and timeout policy.
///
/// Immutable once constructed, per spec: building one is the only way to
/// attach policy to a task before wrapping it as a workflow.
pub struct TaskDescriptor {
    pub(crate) task: Box<dyn Task>,
    pub(crate) retry_policy: Option<RetryPolicy>,
    pub(crate) timeout_policy: Option<TimeoutPolicy>,
}

impl TaskDescriptor {
    /// Wrap a task with no retry and no timeout.
    pub fn new(task: impl Task) -> Self {
        Self {
            task: Box::new(task),
            retry_policy: None,
            timeout_policy: None,
        }
    }

    /// Attach a retry policy.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Attach a per-attempt timeout policy.
    pub fn with_timeout(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = Some(policy);
        self
    }
}

impl From<Box<dyn Task>> for TaskDescriptor {
    fn from(task: Box<dyn Task>) -> Self {
        Self {
            task,
            retry_policy: None,
            timeout_policy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_error_display_is_the_message() {
        let err = TaskError::new("connection refused").with_kind("CONN_REFUSED");
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.kind.as_deref(), Some("CONN_REFUSED"));
    }
}
