use std::fmt::Debug;

use crate::error::InfallibleError;

use super::Step;

/// Logs and swallows the inner step's error, yielding `None` in its place.
#[derive(Debug, Clone)]
pub struct Catch<S> {
    inner: S,
}

impl<S> Catch<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<R, T, S> Step<R, T> for Catch<S>
where
    R: Send,
    T: Send,
    S: Step<R, T> + Sync,
    S::Error: Debug,
{
    type Output = Option<S::Output>;

    type Error = InfallibleError;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        match self.inner.call(receiver, input).await {
            Ok(output) => Ok(Some(output)),
            Err(err) => {
                tracing::warn!(?err, "Step failed, continuing");

                Ok(None)
            }
        }
    }
}
