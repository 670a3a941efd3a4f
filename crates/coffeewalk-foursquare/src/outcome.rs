//! Tri-state completion value for venue operations.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::VenueError;

/// How a venue operation finished. Exactly one variant per completion.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(VenueError),
    /// Superseded by a newer operation on the same client. Not an error.
    Canceled,
}

impl<T> FetchOutcome<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, FetchOutcome::Canceled)
    }

    pub fn map<U, F>(self, f: F) -> FetchOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            FetchOutcome::Success(value) => FetchOutcome::Success(f(value)),
            FetchOutcome::Failure(err) => FetchOutcome::Failure(err),
            FetchOutcome::Canceled => FetchOutcome::Canceled,
        }
    }

    /// Converts to a plain `Result`, with `None` standing in for cancellation.
    pub fn into_result(self) -> Option<Result<T, VenueError>> {
        match self {
            FetchOutcome::Success(value) => Some(Ok(value)),
            FetchOutcome::Failure(err) => Some(Err(err)),
            FetchOutcome::Canceled => None,
        }
    }
}

impl<T> From<Result<T, VenueError>> for FetchOutcome<T> {
    fn from(result: Result<T, VenueError>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Success(value),
            Err(err) => FetchOutcome::Failure(err),
        }
    }
}

/// Future handed back by [`crate::VenueClient::fetch_nearby`] and
/// [`crate::VenueClient::fetch_details`].
///
/// The operation runs on its own task whether or not this is polled.
/// Resolves to [`FetchOutcome::Canceled`] if the task went away without
/// reporting (for example when the runtime shuts down).
#[derive(Debug)]
#[must_use = "the outcome is only observable by awaiting the pending fetch"]
pub struct PendingFetch<T> {
    rx: oneshot::Receiver<FetchOutcome<T>>,
}

impl<T> PendingFetch<T> {
    pub(crate) fn new(rx: oneshot::Receiver<FetchOutcome<T>>) -> Self {
        Self { rx }
    }
}

impl<T> Future for PendingFetch<T> {
    type Output = FetchOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(FetchOutcome::Canceled))
    }
}
