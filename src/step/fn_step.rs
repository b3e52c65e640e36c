use std::future::Future;

use super::{Step, StepFuture};

/// A step backed by a synchronous function of the receiver and the input.
#[derive(Debug, Clone)]
pub struct FnStep<Fn> {
    f: Fn,
}

impl<Fn> FnStep<Fn> {
    pub const fn new(f: Fn) -> Self {
        Self { f }
    }
}

pub fn step_fn<R, T, U, E, Fn>(f: Fn) -> FnStep<Fn>
where
    Fn: std::ops::Fn(&mut R, T) -> Result<U, E>,
{
    FnStep::new(f)
}

impl<R, T, U, E, Fn> Step<R, T> for FnStep<Fn>
where
    R: Send,
    T: Send,
    Fn: std::ops::Fn(&mut R, T) -> Result<U, E> + Sync,
{
    type Output = U;

    type Error = E;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        (self.f)(receiver, input)
    }
}

/// A step backed by a function returning a boxed future that may hold the
/// receiver across awaits.
#[derive(Debug, Clone)]
pub struct AsyncFnStep<Fn> {
    f: Fn,
}

impl<Fn> AsyncFnStep<Fn> {
    pub const fn new(f: Fn) -> Self {
        Self { f }
    }
}

pub fn async_step<R, T, U, E, Fn>(f: Fn) -> AsyncFnStep<Fn>
where
    Fn: for<'a> std::ops::Fn(&'a mut R, T) -> StepFuture<'a, U, E>,
{
    AsyncFnStep::new(f)
}

impl<R, T, U, E, Fn> Step<R, T> for AsyncFnStep<Fn>
where
    Fn: for<'a> std::ops::Fn(&'a mut R, T) -> StepFuture<'a, U, E> + Sync,
{
    type Output = U;

    type Error = E;

    fn call(
        &self,
        receiver: &mut R,
        input: T,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        (self.f)(receiver, input)
    }
}
