//! Core types and trait definitions for the stock research store.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the section record types, the payload validator, the unit-of-work seam and
//! the upsert engine that drives it. Storage backends implement
//! [`unit::UnitOfWork`] and [`store::ResearchStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod coerce;
pub mod engine;
pub mod error;
pub mod memory;
pub mod payload;
pub mod section;
pub mod snapshot;
pub mod stock;
pub mod store;
pub mod unit;

pub use error::{Error, Result};
