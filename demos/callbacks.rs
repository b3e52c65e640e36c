//! Run with
//!
//! ```not_rust
//! cargo run --example callbacks
//! ```
//!

use std::time::Duration;

use anyhow::Context;
use async_chain::{
    callback::Callback,
    chain::AsyncChain,
    step::{callback_step, CancelError, Cancellation, CancellationFlag, StepExt, TimeoutError},
};

#[path = "../util/util.rs"]
mod util;

#[derive(Debug, Default)]
struct Download {
    flag: CancellationFlag,
    fetched: Vec<String>,
}

impl Cancellation for Download {
    fn cancellation(&self) -> &CancellationFlag {
        &self.flag
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid url: {0}")]
struct InvalidUrl(String);

#[derive(Debug, thiserror::Error)]
enum DownloadError {
    #[error("Download failed: {0}")]
    Step(#[from] TimeoutError<CancelError<InvalidUrl>>),
}

/// Pretends to fetch `url` in the background and calls back with its body.
fn fetch(
    download: &mut Download,
    url: String,
    callback: Callback<String>,
) -> Result<(), InvalidUrl> {
    if !url.starts_with("https://") {
        return Err(InvalidUrl(url));
    }

    download.fetched.push(url.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;

        callback.call(format!("<body of {url}>"));
    });

    Ok(())
}

fn next_url(_: &mut Download, body: String, callback: Callback<String>) -> Result<(), InvalidUrl> {
    callback.call(format!("https://example.com/after/{}", body.len()));

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init("callbacks")?;

    let chain = AsyncChain::<_, _, DownloadError>::builder(Download::default())
        .name("downloads")
        .step(
            callback_step(fetch)
                .cancellable()
                .timeout(Duration::from_secs(1)),
        )
        .step(
            callback_step(next_url)
                .cancellable()
                .timeout(Duration::from_secs(1)),
        )
        .step(
            callback_step(fetch)
                .cancellable()
                .timeout(Duration::from_secs(1)),
        )
        .build();

    let body = chain
        .invoke(String::from("https://example.com"))
        .await
        .context("Chain failed")?;

    tracing::info!(%body, "First run");

    let flag = chain.receiver().await.flag.clone();

    let handle = chain.spawn(String::from("https://example.com/cancelled"));

    flag.cancel();

    match handle.await.context("Chain task panicked")? {
        Ok(body) => tracing::info!(%body, "Second run finished before cancellation"),
        Err(err) => tracing::info!(%err, "Second run cancelled"),
    }

    tracing::info!(fetched = ?chain.receiver().await.fetched);

    Ok(())
}
