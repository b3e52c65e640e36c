use crate::step::{Step, StepFuture};

pub(crate) trait ErasedStep<R, T, E>: Send + Sync {
    fn call_boxed<'a>(&'a self, receiver: &'a mut R, input: T) -> StepFuture<'a, T, E>;
}

impl<R, T, E, S> ErasedStep<R, T, E> for S
where
    R: Send + 'static,
    T: Send + 'static,
    E: 'static,
    S: Step<R, T, Output = T> + Send + Sync + 'static,
    S::Error: Into<E>,
{
    fn call_boxed<'a>(&'a self, receiver: &'a mut R, input: T) -> StepFuture<'a, T, E> {
        Box::pin(async move { self.call(receiver, input).await.map_err(Into::into) })
    }
}
