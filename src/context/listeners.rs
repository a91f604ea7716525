//! Listener fan-out: start/success/failure notifications for every workflow

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::Context;
use crate::result::WorkflowResult;

/// Observer notified around every `Workflow::execute` call.
///
/// A listener that panics is caught and logged; it never prevents delivery
/// to the remaining listeners, and never alters the workflow's own result.
pub trait WorkflowListener: Send + Sync {
    fn on_start(&self, _name: &str, _ctx: &Context) {}
    fn on_success(&self, _name: &str, _ctx: &Context, _result: &WorkflowResult) {}
    fn on_failure(&self, _name: &str, _ctx: &Context, _error: &crate::error::EngineError) {}
}

/// The registry of listeners attached to a [`Context`].
///
/// Cloning a registry yields another handle to the *same* underlying list
/// (see [`Context::copy`](super::Context::copy), which shares listeners by
/// reference across the parent and the copy).
#[derive(Clone)]
pub struct WorkflowListeners {
    inner: Arc<RwLock<Vec<Arc<dyn WorkflowListener>>>>,
}

impl Default for WorkflowListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowListeners {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn register(&self, listener: Arc<dyn WorkflowListener>) {
        self.inner.write().push(listener);
    }

    pub(crate) fn inner(&self) -> &Arc<RwLock<Vec<Arc<dyn WorkflowListener>>>> {
        &self.inner
    }

    pub fn notify_start(&self, name: &str, ctx: &Context) {
        debug!(workflow = name, "workflow started");
        for listener in self.inner.read().iter() {
            let listener = listener.clone();
            let name = name.to_string();
            if std::panic::catch_unwind(AssertUnwindSafe(|| listener.on_start(&name, ctx))).is_err() {
                warn!(workflow = %name, "listener panicked during on_start");
            }
        }
    }

    pub fn notify_success(&self, name: &str, ctx: &Context, result: &WorkflowResult) {
        debug!(workflow = name, status = ?result.status, "workflow succeeded");
        for listener in self.inner.read().iter() {
            let listener = listener.clone();
            if std::panic::catch_unwind(AssertUnwindSafe(|| listener.on_success(name, ctx, result)))
                .is_err()
            {
                warn!(workflow = name, "listener panicked during on_success");
            }
        }
    }

    pub fn notify_failure(&self, name: &str, ctx: &Context, error: &crate::error::EngineError) {
        debug!(workflow = name, kind = error.kind(), "workflow failed");
        for listener in self.inner.read().iter() {
            let listener = listener.clone();
            if std::panic::catch_unwind(AssertUnwindSafe(|| listener.on_failure(name, ctx, error)))
                .is_err()
            {
                warn!(workflow = name, "listener panicked during on_failure");
            }
        }
    }
}
