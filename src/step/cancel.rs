use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::Notify;

use super::Step;

#[derive(Debug, Default)]
struct CancellationFlagInner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A shared, one-way cancellation switch, usually kept on a chain's receiver.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    inner: Arc<CancellationFlagInner>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Completes once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();

            if self.is_cancelled() {
                return;
            }

            notified.await;
        }
    }
}

/// Receivers that carry a [`CancellationFlag`].
pub trait Cancellation {
    fn cancellation(&self) -> &CancellationFlag;
}

impl Cancellation for CancellationFlag {
    fn cancellation(&self) -> &CancellationFlag {
        self
    }
}

/// Refuses to start the inner step once the receiver's flag is set, and
/// abandons it if the flag is set while it runs.
#[derive(Debug, Clone)]
pub struct Cancellable<S> {
    inner: S,
}

impl<S> Cancellable<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<R, T, S> Step<R, T> for Cancellable<S>
where
    R: Cancellation + Send,
    T: Send,
    S: Step<R, T> + Sync,
{
    type Output = S::Output;

    type Error = CancelError<S::Error>;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        let flag = receiver.cancellation().clone();

        if flag.is_cancelled() {
            tracing::debug!("Cancelled before start");

            return Err(CancelError::Cancelled);
        }

        tokio::select! {
            result = self.inner.call(receiver, input) => result.map_err(CancelError::Step),
            _ = flag.cancelled() => {
                tracing::debug!("Cancelled while running");

                Err(CancelError::Cancelled)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CancelError<E> {
    #[error("Cancelled")]
    Cancelled,
    #[error("Step error: {0}")]
    Step(#[source] E),
}
