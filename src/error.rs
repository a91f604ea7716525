//! Error taxonomy shared by every workflow in the engine
//!
//! No workflow ever lets an exception escape `execute`: every failure is
//! folded into a [`WorkflowResult`](crate::result::WorkflowResult) carrying
//! one of the [`EngineError`] kinds below. The kind is what callers branch
//! on; the message is for humans.

use serde::{Deserialize, Serialize};

use crate::task::TaskError;

/// The error kinds a workflow execution can fail with.
///
/// This is a closed taxonomy: every composite in the crate produces one of
/// these, and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EngineError {
    /// A task reported failure.
    Task(TaskError),

    /// A wall-clock deadline was exceeded.
    Timeout {
        /// What was being waited on (a task attempt, an inner workflow, ...).
        context: String,
    },

    /// The executing thread or a blocking call was interrupted or cancelled.
    Interrupted {
        /// What was interrupted.
        context: String,
    },

    /// Interrupted while waiting for a rate limiter permit.
    RateLimitInterrupted,

    /// A switch selector raised or returned an unusable value.
    Selector {
        /// Human-readable detail.
        message: String,
    },

    /// A switch found no matching branch and no default.
    NoMatchingBranch {
        /// The key the selector produced.
        key: String,
    },

    /// A conditional predicate raised.
    Predicate {
        /// Human-readable detail.
        message: String,
    },

    /// A saga's forward execution failed and one or more compensations
    /// additionally failed while rolling back.
    SagaCompensation {
        /// The original forward failure.
        cause: Box<EngineError>,
        /// Failures raised by compensations, in the order they occurred.
        suppressed: Vec<EngineError>,
    },

    /// One or more children of a parallel composite failed.
    ParallelFailures {
        /// The first failure, in submission order.
        cause: Box<EngineError>,
        /// Every other failure observed, in submission order.
        suppressed: Vec<EngineError>,
    },

    /// A builder detected an invalid workflow tree at build time.
    ///
    /// This variant never appears in a [`WorkflowResult`](crate::result::WorkflowResult);
    /// it is only ever returned directly from a builder's `build()`.
    Composition {
        /// Human-readable detail.
        message: String,
    },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task(err) => write!(f, "task error: {err}"),
            Self::Timeout { context } => write!(f, "timed out: {context}"),
            Self::Interrupted { context } => write!(f, "interrupted: {context}"),
            Self::RateLimitInterrupted => write!(f, "interrupted while waiting for rate limit permit"),
            Self::Selector { message } => write!(f, "selector error: {message}"),
            Self::NoMatchingBranch { key } => write!(f, "no branch matched selector key {key:?}"),
            Self::Predicate { message } => write!(f, "predicate error: {message}"),
            Self::SagaCompensation { cause, suppressed } => {
                write!(f, "saga failed: {cause}")?;
                if !suppressed.is_empty() {
                    write!(f, " ({} compensation failure(s))", suppressed.len())?;
                }
                Ok(())
            }
            Self::ParallelFailures { cause, suppressed } => {
                write!(f, "parallel composite failed: {cause}")?;
                if !suppressed.is_empty() {
                    write!(f, " ({} other failure(s))", suppressed.len())?;
                }
                Ok(())
            }
            Self::Composition { message } => write!(f, "invalid workflow composition: {message}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// A short, stable tag for this error's variant, handy for metrics/logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Task(_) => "task",
            Self::Timeout { .. } => "timeout",
            Self::Interrupted { .. } => "interrupted",
            Self::RateLimitInterrupted => "rate_limit_interrupted",
            Self::Selector { .. } => "selector",
            Self::NoMatchingBranch { .. } => "no_matching_branch",
            Self::Predicate { .. } => "predicate",
            Self::SagaCompensation { .. } => "saga_compensation",
            Self::ParallelFailures { .. } => "parallel_failures",
            Self::Composition { .. } => "composition",
        }
    }

    pub(crate) fn timeout(context: impl Into<String>) -> Self {
        Self::Timeout {
            context: context.into(),
        }
    }

    pub(crate) fn interrupted(context: impl Into<String>) -> Self {
        Self::Interrupted {
            context: context.into(),
        }
    }

    pub(crate) fn selector(message: impl Into<String>) -> Self {
        Self::Selector {
            message: message.into(),
        }
    }

    pub(crate) fn predicate(message: impl Into<String>) -> Self {
        Self::Predicate {
            message: message.into(),
        }
    }

    pub(crate) fn composition(message: impl Into<String>) -> Self {
        Self::Composition {
            message: message.into(),
        }
    }
}

impl From<TaskError> for EngineError {
    fn from(err: TaskError) -> Self {
        Self::Task(err)
    }
}

/// Error returned by a builder when the workflow tree it describes is invalid.
///
/// Distinct from [`EngineError::Composition`] only in that this one is a
/// plain `Result` error at build time, never wrapped in a [`WorkflowResult`].
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{0}")]
pub struct CompositionError(pub String);

impl CompositionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause_and_suppressed_count() {
        let err = EngineError::SagaCompensation {
            cause: Box::new(EngineError::Task(TaskError::new("boom"))),
            suppressed: vec![EngineError::Task(TaskError::new("refund failed"))],
        };
        let text = err.to_string();
        assert!(text.contains("boom"));
        assert!(text.contains("1 compensation failure"));
    }

    #[test]
    fn kind_is_stable_per_variant() {
        assert_eq!(EngineError::RateLimitInterrupted.kind(), "rate_limit_interrupted");
        assert_eq!(
            EngineError::NoMatchingBranch { key: "x".into() }.kind(),
            "no_matching_branch"
        );
    }
}
