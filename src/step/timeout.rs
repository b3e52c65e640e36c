use std::time::Duration;

use super::Step;

/// Fails with [`TimeoutError::Elapsed`] when the inner step does not complete
/// within `duration`.
#[derive(Debug, Clone)]
pub struct Timeout<S> {
    inner: S,
    duration: Duration,
}

impl<S> Timeout<S> {
    pub const fn new(inner: S, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<R, T, S> Step<R, T> for Timeout<S>
where
    R: Send,
    T: Send,
    S: Step<R, T> + Sync,
{
    type Output = S::Output;

    type Error = TimeoutError<S::Error>;

    #[tracing::instrument(skip_all, fields(timeout = ?self.duration))]
    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        match tokio::time::timeout(self.duration, self.inner.call(receiver, input)).await {
            Ok(result) => result.map_err(TimeoutError::Step),
            Err(_) => {
                tracing::debug!("Step timed out");

                Err(TimeoutError::Elapsed(self.duration))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("Step did not complete within {0:?}")]
    Elapsed(Duration),
    #[error("Step error: {0}")]
    Step(#[source] E),
}
