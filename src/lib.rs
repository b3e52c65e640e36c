#![deny(unsafe_code, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Sequential composition of asynchronous steps that share one mutable
//! receiver.
//!
//! A [`Step`](step::Step) takes the receiver and the previous step's output
//! and completes with its own output or an error. An
//! [`AsyncChain`](chain::AsyncChain) runs a fixed list of steps strictly one
//! after another, stopping at the first error.

pub mod callback;
pub mod chain;
pub mod error;
pub mod step;

#[cfg(test)]
mod test;
