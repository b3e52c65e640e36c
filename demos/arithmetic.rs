//! Run with
//!
//! ```not_rust
//! cargo run --example arithmetic
//! ```
//!

use anyhow::Context;
use async_chain::{chain::AsyncChain, error::InfallibleError, step::step_fn};

#[path = "../util/util.rs"]
mod util;

#[derive(Debug, Default)]
struct Methods {
    x: i64,
}

fn save(methods: &mut Methods, x: i64) -> Result<i64, InfallibleError> {
    methods.x = x;

    Ok(x)
}

fn add_x(methods: &mut Methods, x: i64) -> Result<i64, InfallibleError> {
    Ok(x + methods.x)
}

fn double(_: &mut Methods, x: i64) -> Result<i64, InfallibleError> {
    Ok(x * 2)
}

fn neg(_: &mut Methods, x: i64) -> Result<i64, InfallibleError> {
    Ok(-x)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init("arithmetic")?;

    let chain = AsyncChain::<_, _, InfallibleError>::builder(Methods::default())
        .name("arithmetic")
        .step(step_fn(save))
        .step(step_fn(add_x))
        .step(step_fn(add_x))
        .step(step_fn(neg))
        .step(step_fn(add_x))
        .step(step_fn(double))
        .step(step_fn(add_x))
        .step(step_fn(save))
        .build();

    chain.run(1).await.context("Chain failed")?;

    // ((1 + 1 + 1) * (-1) + 1) * 2 + 1 = -3
    tracing::info!(x = chain.receiver().await.x, "Done");

    Ok(())
}
