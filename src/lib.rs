//! # flowcore
//!
//! An in-process workflow composition engine: a small algebra of composites
//! (sequential, parallel, conditional, switch, fallback, saga, timeout,
//! rate-limited, repeat, for-each) built over a single [`Workflow`] trait,
//! plus the reliability primitives (retry, backoff, timeout policies) and
//! rate limiters they compose with.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Workflow                              │
//! │   (one async trait; every composite below implements it)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!           ┌──────────────────┼──────────────────┐
//!           ▼                  ▼                  ▼
//!   Sequential / Parallel   Conditional /      Saga / Fallback /
//!   (composition)           Switch (routing)   Timeout / RateLimited
//!                              │                  (resilience)
//!                              ▼
//!                           Context
//!            (typed, thread-safe key-value store + listeners)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use flowcore::prelude::*;
//! use std::sync::Arc;
//!
//! let pipeline = Sequential::new(vec![
//!     Arc::new(TaskWorkflow::new(TaskDescriptor::new(FetchOrder))),
//!     Arc::new(TaskWorkflow::new(TaskDescriptor::new(ChargeCard).with_retry(RetryPolicy::exponential()))),
//! ]);
//!
//! let ctx = Context::new();
//! let result = pipeline.execute(&ctx).await;
//! assert!(result.is_success());
//! ```

pub mod context;
pub mod error;
pub mod executor;
pub mod ratelimit;
pub mod reliability;
pub mod result;
pub mod task;
pub mod workflow;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::context::{Context, ContextError, ScopedContext, TypeKey, WorkflowListener};
    pub use crate::error::{CompositionError, EngineError};
    pub use crate::executor::{Executor, TokioExecutor};
    pub use crate::ratelimit::{
        FixedWindowLimiter, LeakyBucketLimiter, RateLimitStrategy, SlidingWindowLimiter,
        TokenBucketLimiter,
    };
    pub use crate::reliability::{
        backoff::BackoffStrategy, NoopSleeper, RecordingSleeper, RetryPolicy, Sleeper,
        SystemSleeper, TimeoutPolicy,
    };
    pub use crate::result::{WorkflowResult, WorkflowStatus};
    pub use crate::task::{Task, TaskDescriptor, TaskError};
    pub use crate::workflow::{
        Conditional, Fallback, ForEach, Parallel, RateLimited, Repeat, Saga, SagaBuilder,
        SagaStep, Sequential, Switch, SwitchBuilder, TaskWorkflow, Timeout, Workflow,
        SAGA_FAILED_STEP, SAGA_FAILURE_CAUSE,
    };
}

pub use context::{Context, ContextError};
pub use error::EngineError;
pub use result::{WorkflowResult, WorkflowStatus};
pub use task::{Task, TaskDescriptor, TaskError};
pub use workflow::Workflow;
