mod erased;
mod observer;
mod service;

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use tokio::{
    sync::{Mutex, MutexGuard},
    task::JoinHandle,
};

use crate::step::Step;

use erased::ErasedStep;

pub use observer::{ChainObserver, ChainState, TracingObserver, Transition};

#[cfg(test)]
pub use observer::MockChainObserver;

struct AsyncChainInner<R, T, E> {
    name: String,
    receiver: Mutex<R>,
    steps: Vec<Box<dyn ErasedStep<R, T, E>>>,
    observer: Arc<dyn ChainObserver + Send + Sync>,
    invocations: AtomicU64,
}

/// An ordered, fixed sequence of steps sharing one receiver.
///
/// Every invocation threads its input through the steps in order. A step only
/// starts once the previous one has completed, and holds the receiver
/// exclusively while it runs. The receiver lives as long as the chain, so
/// state written by one invocation is seen by the next.
pub struct AsyncChain<R, T, E> {
    inner: Arc<AsyncChainInner<R, T, E>>,
}

impl<R, T, E> AsyncChain<R, T, E> {
    pub fn builder(receiver: R) -> AsyncChainBuilder<R, T, E> {
        AsyncChainBuilder::new(receiver)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn len(&self) -> usize {
        self.inner.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.steps.is_empty()
    }

    /// Locks the receiver.
    ///
    /// Holding the guard blocks every step of every invocation of this chain.
    pub async fn receiver(&self) -> MutexGuard<'_, R> {
        self.inner.receiver.lock().await
    }

    fn observe(&self, invocation: u64, state: ChainState) {
        self.inner
            .observer
            .on_transition(&self.inner.name, Transition { invocation, state });
    }
}

impl<R, T, E> AsyncChain<R, T, E>
where
    R: Send,
    T: Send,
{
    /// Runs one invocation and returns the output of the last step.
    ///
    /// The first failing step ends the invocation; later steps are not run.
    /// An empty chain returns `input` unchanged.
    #[tracing::instrument(name = "chain", skip_all, fields(chain = %self.inner.name, invocation = tracing::field::Empty))]
    pub async fn invoke(&self, input: T) -> Result<T, ChainError<E>> {
        let invocation = self.inner.invocations.fetch_add(1, Ordering::Relaxed);

        tracing::Span::current().record("invocation", invocation);

        self.observe(invocation, ChainState::NotStarted);

        let mut value = input;

        for (index, step) in self.inner.steps.iter().enumerate() {
            self.observe(invocation, ChainState::Running { index });

            let mut receiver = self.inner.receiver.lock().await;

            match step.call_boxed(&mut receiver, value).await {
                Ok(output) => value = output,
                Err(source) => {
                    self.observe(invocation, ChainState::Failed { index });

                    return Err(ChainError::Step { index, source });
                }
            }
        }

        self.observe(invocation, ChainState::Completed);

        Ok(value)
    }

    /// Runs one invocation, discarding the final output.
    pub async fn run(&self, input: T) -> Result<(), ChainError<E>> {
        self.invoke(input).await.map(|_| ())
    }
}

impl<R, T, E> AsyncChain<R, T, E>
where
    R: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Starts an invocation on the current tokio runtime without waiting for it.
    pub fn spawn(&self, input: T) -> JoinHandle<Result<T, ChainError<E>>> {
        let chain = self.clone();

        tokio::spawn(async move { chain.invoke(input).await })
    }
}

impl<R, T, E> Clone for AsyncChain<R, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R, T, E> fmt::Debug for AsyncChain<R, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncChain")
            .field("name", &self.inner.name)
            .field("steps", &self.inner.steps.len())
            .finish_non_exhaustive()
    }
}

impl<R, T, E> fmt::Debug for AsyncChainInner<R, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncChainInner")
            .field("name", &self.name)
            .field("steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}

pub struct AsyncChainBuilder<R, T, E> {
    name: String,
    receiver: R,
    steps: Vec<Box<dyn ErasedStep<R, T, E>>>,
    observer: Arc<dyn ChainObserver + Send + Sync>,
}

impl<R, T, E> AsyncChainBuilder<R, T, E> {
    pub fn new(receiver: R) -> Self {
        Self {
            name: String::from("chain"),
            receiver,
            steps: Vec::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: ChainObserver + Send + Sync + 'static,
    {
        self.observer = Arc::new(observer);
        self
    }

    /// Appends a step. Steps run in the order they are added.
    pub fn step<S>(mut self, step: S) -> Self
    where
        R: Send + 'static,
        T: Send + 'static,
        E: 'static,
        S: Step<R, T, Output = T> + Send + Sync + 'static,
        S::Error: Into<E>,
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn build(self) -> AsyncChain<R, T, E> {
        AsyncChain {
            inner: Arc::new(AsyncChainInner {
                name: self.name,
                receiver: Mutex::new(self.receiver),
                steps: self.steps,
                observer: self.observer,
                invocations: AtomicU64::new(0),
            }),
        }
    }
}

impl<R, T, E> fmt::Debug for AsyncChainBuilder<R, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncChainBuilder")
            .field("name", &self.name)
            .field("steps", &self.steps.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChainError<E> {
    #[error("Step {index} failed: {source}")]
    Step {
        index: usize,
        #[source]
        source: E,
    },
}

impl<E> ChainError<E> {
    pub fn index(&self) -> usize {
        match self {
            ChainError::Step { index, .. } => *index,
        }
    }

    pub fn into_source(self) -> E {
        match self {
            ChainError::Step { source, .. } => source,
        }
    }
}
