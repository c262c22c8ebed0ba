//! Detached background work.
//!
//! Tasks spawned here are never awaited by the code that starts them. Each
//! one runs under its own timeout, and its outcome is only ever reported
//! through `tracing`: nothing propagates back to the caller.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::task::JoinHandle;

/// How a background task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Failed,
    TimedOut,
    Panicked,
}

/// Spawner for fire-and-forget tasks with a per-task timeout.
#[derive(Debug, Clone)]
pub struct BackgroundTasks {
    timeout: Duration,
}

impl BackgroundTasks {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Spawns `fut` on the runtime, detached from the caller.
    ///
    /// Dropping the returned handle does not cancel the task. Errors,
    /// timeouts and panics are logged and otherwise discarded.
    pub fn spawn<F, E>(&self, task: &'static str, fut: F) -> JoinHandle<TaskOutcome>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let timeout = self.timeout;

        tokio::spawn(async move {
            let guarded = AssertUnwindSafe(fut).catch_unwind();

            match tokio::time::timeout(timeout, guarded).await {
                Ok(Ok(Ok(()))) => {
                    tracing::trace!(task, "Background task completed");
                    TaskOutcome::Completed
                }
                Ok(Ok(Err(err))) => {
                    tracing::warn!(task, error = %err, "Background task failed");
                    TaskOutcome::Failed
                }
                Ok(Err(panic)) => {
                    tracing::error!(
                        task,
                        panic = panic_message(panic.as_ref()),
                        "Background task panicked"
                    );
                    TaskOutcome::Panicked
                }
                Err(_) => {
                    tracing::warn!(
                        task,
                        timeout_ms = timeout.as_millis() as u64,
                        "Background task timed out"
                    );
                    TaskOutcome::TimedOut
                }
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
