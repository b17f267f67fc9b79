//! Core types and the store trait for the food-price warehouse loader.
//!
//! This crate is deliberately free of database dependencies. The loader and
//! every store backend depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dimension;
pub mod error;
pub mod fact;
pub mod record;
pub mod store;

pub use error::{Error, Result};
