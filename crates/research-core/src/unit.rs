//! The unit-of-work seam between the upsert engine and a storage backend.
//!
//! A [`UnitOfWork`] hands out one [`Transaction`] at a time. The transaction
//! owns the backend connection for its whole lifetime; dropping it without
//! calling [`Transaction::commit`] must discard every write made through it,
//! so the connection is released on every exit path.

use crate::section::SectionRecord;

/// What a single section write reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
  /// Row id of the inserted or overwritten row, when the backend reports it.
  pub id:            Option<i64>,
  /// Rows touched by the statement. An insert and an overwrite both count 1.
  pub affected_rows: usize,
}

pub trait UnitOfWork {
  type Error: std::error::Error + Send + Sync + 'static;
  type Tx<'a>: Transaction<Error = Self::Error>
  where
    Self: 'a;

  /// Acquire the connection and open a transaction on it.
  fn begin(&mut self) -> Result<Self::Tx<'_>, Self::Error>;
}

pub trait Transaction {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve a stock symbol to its surrogate id.
  fn stock_id(&mut self, symbol: &str) -> Result<Option<i64>, Self::Error>;

  /// Insert `record` for `stock_id`, or overwrite every non-key column of the
  /// row that already holds the same natural key.
  fn upsert(
    &mut self,
    stock_id: i64,
    record: &SectionRecord,
  ) -> Result<WriteOutcome, Self::Error>;

  /// Overwrite the row owned by `stock_id` without inserting. Reports zero
  /// affected rows when there is nothing to update.
  fn update_by_stock(
    &mut self,
    stock_id: i64,
    record: &SectionRecord,
  ) -> Result<WriteOutcome, Self::Error>;

  fn commit(self) -> Result<(), Self::Error>;

  fn rollback(self) -> Result<(), Self::Error>;
}
