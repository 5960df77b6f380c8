//! SQLite backend for the stock research store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. A research write runs the core upsert
//! engine inside a single call on that thread, holding one immediate
//! transaction from stock resolution to commit.

mod encode;
mod schema;
mod store;
mod unit;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
