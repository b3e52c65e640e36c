//! One-shot continuations for callback-style code.
//!
//! [`channel`] hands out a [`Callback`] to give to callback-style code and a
//! [`Pending`] to wait on. A callback is consumed when invoked, so it can
//! deliver at most one value.

use std::fmt;

use tokio::sync::oneshot;

pub fn channel<T>() -> (Callback<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();

    (Callback { tx }, Pending { rx })
}

pub struct Callback<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Callback<T> {
    /// Delivers `value` to the waiting side.
    ///
    /// Does nothing if the waiting side is gone.
    pub fn call(self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::trace!("Callback invoked after the waiting side was dropped");
        }
    }

    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("abandoned", &self.is_abandoned())
            .finish()
    }
}

pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Pending<T> {
    pub async fn wait(self) -> Result<T, CallbackDropped> {
        self.rx.await.map_err(|_| CallbackDropped)
    }

    /// Blocks the current thread until the callback fires.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn wait_blocking(self) -> Result<T, CallbackDropped> {
        self.rx.blocking_recv().map_err(|_| CallbackDropped)
    }
}

impl<T, E> Pending<Result<T, E>> {
    /// Waits for a callback that delivers either a result or an error, and
    /// surfaces the delivered error as an error.
    pub async fn settle(self) -> Result<T, SettleError<E>> {
        match self.wait().await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(SettleError::Failed(err)),
            Err(CallbackDropped) => Err(SettleError::Dropped),
        }
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Callback was dropped without being invoked")]
pub struct CallbackDropped;

#[derive(Debug, thiserror::Error)]
pub enum SettleError<E> {
    #[error("Callback was dropped without being invoked")]
    Dropped,
    #[error("Callback delivered an error: {0}")]
    Failed(#[source] E),
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::test::init_tracing;

    use super::*;

    #[tokio::test]
    async fn callback_delivers_value() {
        init_tracing();

        let (callback, pending) = channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;

            callback.call(42);
        });

        assert_eq!(pending.wait().await, Ok(42));
    }

    #[tokio::test]
    async fn dropped_callback_is_reported() {
        init_tracing();

        let (callback, pending) = channel::<u8>();

        drop(callback);

        assert_eq!(pending.wait().await, Err(CallbackDropped));
    }

    #[tokio::test]
    async fn callback_sees_abandoned_waiter() {
        init_tracing();

        let (callback, pending) = channel::<u8>();

        assert!(!callback.is_abandoned());

        drop(pending);

        assert!(callback.is_abandoned());

        callback.call(1);
    }

    #[tokio::test]
    async fn settle_surfaces_delivered_error() {
        init_tracing();

        let (callback, pending) = channel::<Result<u8, anyhow::Error>>();

        callback.call(Err(anyhow::anyhow!("install failed")));

        match pending.settle().await {
            Err(SettleError::Failed(err)) => assert_eq!(err.to_string(), "install failed"),
            other => panic!("Expected delivered error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn settle_returns_delivered_value() {
        init_tracing();

        let (callback, pending) = channel::<Result<u8, anyhow::Error>>();

        callback.call(Ok(3));

        assert_eq!(pending.settle().await.expect("Settle failed"), 3);
    }

    #[test]
    fn wait_blocking_returns_value_from_other_thread() {
        init_tracing();

        let (callback, pending) = channel();

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));

            callback.call("done");
        });

        assert_eq!(pending.wait_blocking(), Ok("done"));

        handle.join().expect("Thread panicked");
    }
}
