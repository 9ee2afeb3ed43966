//! Channel-backed futures for the async facade entry points
//!
//! Signing and verification are CPU-bound, so work runs on the tokio
//! blocking pool and reports back over a oneshot channel. Callers can
//! `.await` without the token types having to be async.

use crate::error::{JwsError, JwsResult};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::warn;

/// Result of a background token operation
#[must_use = "futures do nothing unless awaited"]
pub struct AsyncJwsResult<T> {
    receiver: oneshot::Receiver<JwsResult<T>>,
}

impl<T: Send + 'static> AsyncJwsResult<T> {
    pub(crate) fn new(receiver: oneshot::Receiver<JwsResult<T>>) -> Self {
        Self { receiver }
    }

    /// Run `work` on the current runtime's blocking pool and resolve with
    /// its result
    ///
    /// Outside a tokio runtime nothing runs and the future resolves to
    /// [`JwsError::TaskFailed`].
    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> JwsResult<T> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    // Receiver may already be gone; nothing to report then.
                    let _ = sender.send(work());
                });
            }
            Err(error) => {
                warn!(%error, "no tokio runtime to run token work on");
                drop(sender);
            }
        }
        Self::new(receiver)
    }
}

impl<T> Future for AsyncJwsResult<T> {
    type Output = JwsResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwsError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
