use std::{future::Future, pin::Pin, time::Duration};

mod callback_step;
mod cancel;
mod catch;
mod defer;
mod fn_step;
mod map;
mod service_step;
mod then;
mod timeout;

pub use callback_step::{callback_step, CallbackStep};
pub use cancel::{CancelError, Cancellable, Cancellation, CancellationFlag};
pub use catch::Catch;
pub use defer::Deferred;
pub use fn_step::{async_step, step_fn, AsyncFnStep, FnStep};
pub use map::{Map, MapError};
pub use service_step::ServiceStep;
pub use then::{Then, ThenError};
pub use timeout::{Timeout, TimeoutError};

/// Boxed future returned by closures passed to [`async_step`].
pub type StepFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// One asynchronous unit of work in a chain.
///
/// A step receives exclusive access to the chain's receiver for the whole
/// duration of its future, plus the output of the previous step. Completing
/// with `Ok` hands the value to the next step. Completing with `Err` halts the
/// chain. A future that never completes leaves the chain pending.
pub trait Step<R, T> {
    type Output;

    type Error;

    fn call(
        &self,
        receiver: &mut R,
        input: T,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

pub trait StepExt<R, T>: Sized + Step<R, T> {
    fn then<S>(self, next: S) -> Then<Self, S>;

    fn map<Fn>(self, map: Fn) -> Map<Self, Fn>;

    fn map_err<Fn>(self, map_err: Fn) -> MapError<Self, Fn>;

    fn catch(self) -> Catch<Self>;

    fn timeout(self, duration: Duration) -> Timeout<Self>;

    fn cancellable(self) -> Cancellable<Self>;

    fn deferred(self) -> Deferred<Self>;
}

impl<R, T, S> StepExt<R, T> for S
where
    S: Sized + Step<R, T>,
{
    fn then<N>(self, next: N) -> Then<Self, N> {
        Then::new(self, next)
    }

    fn map<Fn>(self, map: Fn) -> Map<Self, Fn> {
        Map::new(self, map)
    }

    fn map_err<Fn>(self, map_err: Fn) -> MapError<Self, Fn> {
        MapError::new(self, map_err)
    }

    fn catch(self) -> Catch<Self> {
        Catch::new(self)
    }

    fn timeout(self, duration: Duration) -> Timeout<Self> {
        Timeout::new(self, duration)
    }

    fn cancellable(self) -> Cancellable<Self> {
        Cancellable::new(self)
    }

    fn deferred(self) -> Deferred<Self> {
        Deferred::new(self)
    }
}
