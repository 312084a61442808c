//! Core types and trait definitions for the Rolo contact manager.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend, the REST API and the terminal client all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod error;
pub mod fields;
pub mod filter;
pub mod store;

pub use error::{Error, Result};
