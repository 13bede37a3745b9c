//! Cancellation of in-flight work bound to a view.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{AbortHandle, Abortable};
use tracing::debug;

use crate::error::{ApiError, Result};

/// Owns the abort handles of every operation started through it.
///
/// Once cancelled, in-flight operations resolve to [`ApiError::Cancelled`]
/// and new ones fail immediately. Dropping the scope cancels it.
#[derive(Debug, Default)]
pub struct CancelScope {
    handles: Mutex<HashMap<u64, AbortHandle>>,
    next_id: AtomicU64,
    cancelled: AtomicBool,
}

impl CancelScope {
    /// Creates an active scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fut` within the scope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Cancelled`] if the scope is or becomes cancelled
    /// before `fut` completes; otherwise returns the result of `fut`.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            // checked under the lock so a concurrent cancel() cannot miss us
            if self.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            handles.insert(id, handle);
        }

        let outcome = Abortable::new(fut, registration).await;
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        outcome.unwrap_or(Err(ApiError::Cancelled))
    }

    /// Aborts every operation in flight and refuses new ones.
    pub fn cancel(&self) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if !handles.is_empty() {
            debug!(in_flight = handles.len(), "cancelling scope");
        }
        for (_, handle) in handles.drain() {
            handle.abort();
        }
    }

    /// Returns whether the scope was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Number of operations currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completed_operation_passes_through() {
        let scope = CancelScope::new();
        let value = scope.run(async { Ok::<_, ApiError>(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight() {
        let scope = CancelScope::new();
        let slow = scope.run(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, ApiError>(())
        });
        let cancel = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            scope.cancel();
        };
        let (result, ()) = tokio::join!(slow, cancel);
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_scope_refuses_new_work() {
        let scope = CancelScope::new();
        scope.cancel();
        assert!(scope.is_cancelled());
        let result = scope.run(async { Ok::<_, ApiError>(1) }).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn test_errors_are_not_cancellations() {
        let scope = CancelScope::new();
        let result: Result<()> = scope.run(async { Err(ApiError::NotFound("x".into())) }).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
