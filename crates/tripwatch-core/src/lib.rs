//! Core types and trait definitions for the tripwatch calendar tracker.
//!
//! This crate is deliberately free of HTTP, markup and database dependencies.
//! Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod month;
pub mod notify;
pub mod store;
pub mod subscription;
pub mod trip;

pub use error::{Error, Result};
pub use month::Month;
