use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;

use super::{AsyncChain, ChainError};

/// Each call is one invocation of the chain. Always ready.
impl<R, T, E> Service<T> for AsyncChain<R, T, E>
where
    R: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Response = T;
    type Error = ChainError<E>;
    type Future = Pin<Box<dyn Future<Output = Result<T, ChainError<E>>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, input: T) -> Self::Future {
        let chain = self.clone();

        Box::pin(async move { chain.invoke(input).await })
    }
}

#[cfg(test)]
mod tests {
    use tower::ServiceExt;

    use crate::{
        step::{step_fn, ServiceStep, StepExt},
        test::init_tracing,
    };

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum LedgerError {
        #[error("Overdrawn by {0}")]
        Overdrawn(u64),
        #[error("Nested chain failed: {0}")]
        Nested(#[from] ChainError<Box<LedgerError>>),
    }

    #[derive(Debug, Default)]
    struct Ledger {
        balance: u64,
    }

    fn deposit(ledger: &mut Ledger, amount: u64) -> Result<u64, LedgerError> {
        ledger.balance += amount;

        Ok(ledger.balance)
    }

    fn withdraw_ten(ledger: &mut Ledger, balance: u64) -> Result<u64, LedgerError> {
        if ledger.balance < 10 {
            return Err(LedgerError::Overdrawn(10 - ledger.balance));
        }

        ledger.balance -= 10;

        Ok(balance - 10)
    }

    #[tokio::test]
    async fn chain_is_a_tower_service() {
        init_tracing();

        let chain = AsyncChain::<Ledger, u64, LedgerError>::builder(Ledger::default())
            .step(step_fn(deposit))
            .step(step_fn(withdraw_ten))
            .build();

        let out = chain
            .clone()
            .oneshot(25)
            .await
            .expect("Chain failed");

        assert_eq!(out, 15);
        assert_eq!(chain.receiver().await.balance, 15);

        let second = chain.clone().oneshot(0).await;

        assert!(matches!(second, Ok(5)));
        assert_eq!(chain.receiver().await.balance, 5);

        let err = chain.oneshot(0).await.expect_err("Expected error");

        assert!(matches!(
            err,
            ChainError::Step {
                index: 1,
                source: LedgerError::Overdrawn(5)
            }
        ));
    }

    #[tokio::test]
    async fn chain_nests_inside_another_chain() {
        init_tracing();

        let inner = AsyncChain::<Ledger, u64, Box<LedgerError>>::builder(Ledger::default())
            .name("inner")
            .step(step_fn(deposit).map_err(Box::new))
            .build();

        let outer = AsyncChain::<Ledger, u64, LedgerError>::builder(Ledger::default())
            .name("outer")
            .step(step_fn(deposit))
            .step(ServiceStep::new(inner.clone()))
            .build();

        let out = outer.invoke(3).await.expect("Chain failed");

        assert_eq!(out, 3);
        assert_eq!(outer.receiver().await.balance, 3);
        assert_eq!(inner.receiver().await.balance, 3);
    }
}
