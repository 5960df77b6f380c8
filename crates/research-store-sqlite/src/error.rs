//! Error type for `research-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] research_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value with no JSON counterpart.
  #[error("unsupported value in column {0}")]
  UnsupportedValue(String),

  #[error("a stock with symbol {0:?} already exists")]
  DuplicateSymbol(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl research_core::store::StoreError for Error {
  fn is_duplicate_symbol(&self) -> bool {
    matches!(
      self,
      Error::DuplicateSymbol(_) | Error::Core(research_core::Error::DuplicateSymbol(_))
    )
  }
}
