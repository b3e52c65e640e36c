use super::Step;

/// Yields to the scheduler once before running the inner step.
#[derive(Debug, Clone)]
pub struct Deferred<S> {
    inner: S,
}

impl<S> Deferred<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<R, T, S> Step<R, T> for Deferred<S>
where
    R: Send,
    T: Send,
    S: Step<R, T> + Sync,
{
    type Output = S::Output;

    type Error = S::Error;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        tokio::task::yield_now().await;

        self.inner.call(receiver, input).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        step::{step_fn, StepExt},
        test::init_tracing,
    };

    use super::*;

    #[tokio::test]
    async fn other_tasks_run_first() {
        init_tracing();

        let order = Arc::new(Mutex::new(Vec::new()));

        let spawned_order = order.clone();

        tokio::spawn(async move {
            spawned_order.lock().expect("Poisoned").push("spawned");
        });

        let mut receiver = order.clone();

        step_fn(|order: &mut Arc<Mutex<Vec<&'static str>>>, _: ()| {
            order.lock().expect("Poisoned").push("deferred");

            Ok::<_, anyhow::Error>(())
        })
        .deferred()
        .call(&mut receiver, ())
        .await
        .expect("Step failed");

        assert_eq!(*order.lock().expect("Poisoned"), vec!["spawned", "deferred"]);
    }
}
