use std::{fmt, marker::PhantomData};

use crate::callback::{self, Callback, CallbackDropped};

use super::Step;

/// A step written in continuation-passing style.
///
/// The function runs synchronously with the receiver and receives a
/// [`Callback`] through which it delivers its output, either immediately or
/// later from elsewhere. Returning `Err` fails the step without waiting for
/// the callback. A callback dropped without being invoked leaves the step
/// pending forever.
pub struct CallbackStep<Fn, U, E> {
    f: Fn,
    _marker: PhantomData<fn() -> (U, E)>,
}

impl<Fn, U, E> CallbackStep<Fn, U, E> {
    pub const fn new(f: Fn) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<Fn: Clone, U, E> Clone for CallbackStep<Fn, U, E> {
    fn clone(&self) -> Self {
        Self::new(self.f.clone())
    }
}

impl<Fn, U, E> fmt::Debug for CallbackStep<Fn, U, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackStep").finish_non_exhaustive()
    }
}

pub fn callback_step<R, T, U, E, Fn>(f: Fn) -> CallbackStep<Fn, U, E>
where
    Fn: std::ops::Fn(&mut R, T, Callback<U>) -> Result<(), E>,
{
    CallbackStep::new(f)
}

impl<R, T, U, E, Fn> Step<R, T> for CallbackStep<Fn, U, E>
where
    R: Send,
    T: Send,
    U: Send,
    Fn: std::ops::Fn(&mut R, T, Callback<U>) -> Result<(), E> + Sync,
{
    type Output = U;

    type Error = E;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        let (callback, pending) = callback::channel();

        (self.f)(receiver, input, callback)?;

        match pending.wait().await {
            Ok(output) => Ok(output),
            Err(CallbackDropped) => {
                tracing::warn!("Callback dropped without being invoked, step will never complete");

                std::future::pending().await
            }
        }
    }
}
