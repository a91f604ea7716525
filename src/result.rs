//! [`WorkflowResult`]: the immutable value every `execute` call returns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Terminal status of a workflow execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Success,
    Failed,
    /// A no-op that a composite explicitly reports per spec convention
    /// rather than returns as its own top-level status. `Repeat(w, 0)` and an
    /// empty `Sequential`/`Parallel` still resolve to SUCCESS (the
    /// idempotence laws: doing nothing is not a failure), but `Sequential`
    /// uses SKIPPED to tell listeners about a child it never reached because
    /// an earlier sibling failed — without actually invoking that child.
    Skipped,
}

/// The outcome of a single `Workflow::execute` call.
///
/// `FAILED` always carries an `error`; `SUCCESS`/`SKIPPED` never do. Once
/// constructed, a result is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub status: WorkflowStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub error: Option<EngineError>,
}

impl WorkflowResult {
    pub fn success(started_at: DateTime<Utc>) -> Self {
        Self {
            status: WorkflowStatus::Success,
            started_at,
            completed_at: Utc::now(),
            error: None,
        }
    }

    pub fn skipped(started_at: DateTime<Utc>) -> Self {
        Self {
            status: WorkflowStatus::Skipped,
            started_at,
            completed_at: Utc::now(),
            error: None,
        }
    }

    pub fn failed(started_at: DateTime<Utc>, error: EngineError) -> Self {
        Self {
            status: WorkflowStatus::Failed,
            started_at,
            completed_at: Utc::now(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == WorkflowStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == WorkflowStatus::Failed
    }

    pub fn is_skipped(&self) -> bool {
        self.status == WorkflowStatus::Skipped
    }

    /// Wall-clock duration of the execution.
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}
