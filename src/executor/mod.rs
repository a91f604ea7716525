//! Where parallel children actually run
//!
//! Composites never call `tokio::spawn` directly; they go through an
//! [`Executor`] handle, so a host application can supply its own the same
//! way the teacher's worker crate let callers swap in their own pool. The
//! trait takes a generic future rather than a boxed trait object, so it is
//! not `dyn`-safe by design — composites that need one are generic over
//! `E: Executor` and default to [`TokioExecutor`].

mod tokio_executor;

pub use tokio_executor::TokioExecutor;

use std::future::Future;

use tokio::task::JoinHandle;

/// Spawns futures onto some underlying runtime and hands back a join handle.
///
/// Shutdown is intentionally not part of this trait: an in-process engine
/// holds no background resources of its own to release beyond whatever the
/// host's own async runtime already manages.
pub trait Executor: Send + Sync + 'static {
    fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;
}
