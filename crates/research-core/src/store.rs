//! The `ResearchStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `research-store-sqlite`
//! and the in-memory [`crate::memory::MemoryStore`]). The HTTP layer depends
//! on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  engine::{ApplyError, ApplyReport, WriteMode},
  payload::ResearchPayload,
  snapshot::ResearchSnapshot,
  stock::{NewStock, Stock},
};

/// Backend errors the HTTP layer needs to tell apart from plain failures.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` if a stock could not be registered because its symbol is taken.
  fn is_duplicate_symbol(&self) -> bool;
}

impl StoreError for crate::Error {
  fn is_duplicate_symbol(&self) -> bool {
    matches!(self, crate::Error::DuplicateSymbol(_))
  }
}

/// Abstraction over a research store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ResearchStore: Send + Sync {
  type Error: StoreError;

  // ── Stocks ────────────────────────────────────────────────────────────

  /// Register a new stock. Fails if the symbol is already taken.
  fn register_stock(
    &self,
    input: NewStock,
  ) -> impl Future<Output = Result<Stock, Self::Error>> + Send + '_;

  /// Retrieve a stock by surrogate id. Returns `None` if not found.
  fn get_stock(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Stock>, Self::Error>> + Send + '_;

  /// List all stocks, ordered by symbol.
  fn list_stocks(
    &self,
  ) -> impl Future<Output = Result<Vec<Stock>, Self::Error>> + Send + '_;

  // ── Research ──────────────────────────────────────────────────────────

  /// Apply a validated payload as one transaction.
  fn apply_research(
    &self,
    mode: WriteMode,
    payload: ResearchPayload,
  ) -> impl Future<Output = Result<ApplyReport, ApplyError<Self::Error>>> + Send + '_;

  /// Materialise the latest row of every section for a stock. Returns `None`
  /// if the stock does not exist.
  fn latest_research(
    &self,
    stock_id: i64,
  ) -> impl Future<Output = Result<Option<ResearchSnapshot>, Self::Error>> + Send + '_;
}
