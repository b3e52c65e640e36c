use super::Step;

/// Runs `first`, then feeds its output to `second`, both against the same
/// receiver.
#[derive(Debug, Clone)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<A, B> Then<A, B> {
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<R, T, A, B> Step<R, T> for Then<A, B>
where
    R: Send,
    T: Send,
    A: Step<R, T> + Sync,
    B: Step<R, A::Output> + Sync,
{
    type Output = B::Output;

    type Error = ThenError<A::Error, B::Error>;

    async fn call(&self, receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        let intermediate = self
            .first
            .call(receiver, input)
            .await
            .map_err(ThenError::First)?;

        let output = self
            .second
            .call(receiver, intermediate)
            .await
            .map_err(ThenError::Second)?;

        Ok(output)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThenError<A, B> {
    #[error("First step error: {0}")]
    First(#[source] A),
    #[error("Second step error: {0}")]
    Second(#[source] B),
}

#[cfg(test)]
mod tests {
    use crate::{
        step::{step_fn, StepExt},
        test::init_tracing,
    };

    use super::*;

    #[derive(Debug, Default)]
    struct Scratch {
        seen: Vec<String>,
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("not a number: {0}")]
    struct NotANumber(String);

    fn record(scratch: &mut Scratch, text: String) -> Result<String, NotANumber> {
        scratch.seen.push(text.clone());

        Ok(text)
    }

    fn parse(scratch: &mut Scratch, text: String) -> Result<u32, NotANumber> {
        scratch.seen.push(format!("parse {text}"));

        text.parse().map_err(|_| NotANumber(text))
    }

    #[tokio::test]
    async fn output_of_first_feeds_second() {
        init_tracing();

        let mut scratch = Scratch::default();

        let out = step_fn(record)
            .then(step_fn(parse))
            .call(&mut scratch, String::from("12"))
            .await
            .expect("Chain failed");

        assert_eq!(out, 12);
        assert_eq!(scratch.seen, vec!["12", "parse 12"]);
    }

    #[tokio::test]
    async fn second_error_is_tagged() {
        init_tracing();

        let mut scratch = Scratch::default();

        let err = step_fn(record)
            .then(step_fn(parse))
            .call(&mut scratch, String::from("twelve"))
            .await
            .expect_err("Expected error");

        assert!(matches!(err, ThenError::Second(NotANumber(text)) if text == "twelve"));
    }

    #[tokio::test]
    async fn first_error_skips_second() {
        init_tracing();

        let mut scratch = Scratch::default();

        let err = step_fn(parse)
            .then(step_fn(|scratch: &mut Scratch, n: u32| {
                scratch.seen.push(String::from("unreachable"));

                Ok::<_, NotANumber>(n)
            }))
            .call(&mut scratch, String::from("x"))
            .await
            .expect_err("Expected error");

        assert!(matches!(err, ThenError::First(_)));
        assert_eq!(scratch.seen, vec!["parse x"]);
    }
}
