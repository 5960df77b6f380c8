//! Error types for `research-core`.

use thiserror::Error;

use crate::section::SectionKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("stock not found: {0}")]
  StockNotFound(i64),

  #[error("a stock with symbol {0:?} already exists")]
  DuplicateSymbol(String),

  #[error("{0} did not serialise to a column map")]
  NotAColumnMap(SectionKind),

  /// Raised by the in-memory store when a section write is rigged to fail.
  #[error("write rejected for {0}")]
  WriteRejected(SectionKind),

  #[error("store lock poisoned")]
  Poisoned,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
