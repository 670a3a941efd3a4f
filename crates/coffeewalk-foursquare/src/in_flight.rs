//! Single-slot tracking of the operation a client currently has in flight.
//!
//! Starting an operation replaces the slot's entry. Dropping the old entry
//! drops its cancel sender, which the old task observes as cancellation. The
//! new task waits for the old task to finish before it reports, so completions
//! reach callers in the order operations were started.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::error::VenueError;
use crate::outcome::FetchOutcome;

struct InFlight {
    id: u64,
    operation: &'static str,
    /// Never sent on; dropping it is the cancellation signal.
    _cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

#[derive(Default)]
pub(crate) struct RequestSlot {
    next_id: AtomicU64,
    current: Mutex<Option<InFlight>>,
}

impl RequestSlot {
    /// Cancels whatever is in flight and spawns `work` in its place.
    ///
    /// `completion` runs exactly once, on the spawned task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub(crate) fn start<T, W, C>(&self, operation: &'static str, work: W, completion: C)
    where
        T: Send + 'static,
        W: Future<Output = Result<T, VenueError>> + Send + 'static,
        C: FnOnce(FetchOutcome<T>) + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = current.take().map(|superseded| {
            tracing::debug!(
                request_id = superseded.id,
                operation = superseded.operation,
                superseded_by = id,
                "canceling in-flight venue request"
            );
            superseded.task
        });

        let task = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = &mut cancel_rx => FetchOutcome::Canceled,
                result = work => FetchOutcome::from(result),
            };

            if let Some(previous) = previous {
                // The superseded task always finishes promptly once canceled.
                if let Err(err) = previous.await {
                    if err.is_panic() {
                        tracing::warn!(
                            superseded_by = id,
                            operation,
                            error = %err,
                            "superseded venue request panicked"
                        );
                    }
                }
            }

            // A newer operation may have replaced this one while it waited.
            let outcome = match outcome {
                FetchOutcome::Canceled => FetchOutcome::Canceled,
                finished if matches!(cancel_rx.try_recv(), Err(TryRecvError::Empty)) => finished,
                _ => FetchOutcome::Canceled,
            };

            tracing::debug!(
                request_id = id,
                operation,
                canceled = outcome.is_canceled(),
                "venue request finished"
            );
            completion(outcome);
        });

        *current = Some(InFlight {
            id,
            operation,
            _cancel: cancel_tx,
            task,
        });
    }

    /// Cancels the in-flight operation, if any.
    pub(crate) fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(canceled) = current.take() {
            tracing::debug!(
                request_id = canceled.id,
                operation = canceled.operation,
                "canceling in-flight venue request"
            );
        }
    }
}
