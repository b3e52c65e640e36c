use super::Step;

#[derive(Debug, Clone)]
pub struct Map<S, Fn> {
    inner: S,
    map: Fn,
}

impl<S, Fn> Map<S, Fn> {
    pub const fn new(inner: S, map: Fn) -> Self {
        Self { inner, map }
    }
}

#[derive(Debug, Clone)]
pub struct MapError<S, Fn> {
    inner: S,
    map_err: Fn,
}

impl<S, Fn> MapError<S, Fn> {
    pub const fn new(inner: S, map_err: Fn) -> Self {
        Self { inner, map_err }
    }
}

impl<R, T, S, Fn, U> Step<R, T> for Map<S, Fn>
where
    R: Send,
    T: Send,
    S: Step<R, T> + Sync,
    Fn: FnOnce(S::Output) -> U + Clone + Sync,
{
    type Output = U;

    type Error = S::Error;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        self.inner
            .call(receiver, input)
            .await
            .map(|out| (self.map.clone())(out))
    }
}

impl<R, T, S, Fn, E> Step<R, T> for MapError<S, Fn>
where
    R: Send,
    T: Send,
    S: Step<R, T> + Sync,
    Fn: FnOnce(S::Error) -> E + Clone + Sync,
{
    type Output = S::Output;

    type Error = E;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        self.inner
            .call(receiver, input)
            .await
            .map_err(|err| (self.map_err.clone())(err))
    }
}
