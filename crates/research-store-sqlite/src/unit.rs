//! The SQLite unit of work: one immediate transaction on the store's
//! connection, driven by the core upsert engine.
//!
//! A [`rusqlite::Transaction`] rolls back when dropped uncommitted, so the
//! connection is back in autocommit mode on every exit path.

use research_core::{
  section::SectionRecord,
  unit::{Transaction, UnitOfWork, WriteOutcome},
};
use rusqlite::{OptionalExtension as _, TransactionBehavior, params_from_iter};

use crate::{
  Error, Result,
  encode::{encode_columns, table_name},
};

pub struct SqliteUnit<'c> {
  conn: &'c mut rusqlite::Connection,
}

impl<'c> SqliteUnit<'c> {
  pub fn new(conn: &'c mut rusqlite::Connection) -> Self { Self { conn } }
}

pub struct SqliteTx<'a> {
  tx: rusqlite::Transaction<'a>,
}

impl UnitOfWork for SqliteUnit<'_> {
  type Error = Error;
  type Tx<'a>
    = SqliteTx<'a>
  where
    Self: 'a;

  fn begin(&mut self) -> Result<SqliteTx<'_>> {
    let tx = self
      .conn
      .transaction_with_behavior(TransactionBehavior::Immediate)?;
    Ok(SqliteTx { tx })
  }
}

/// `?2, ?3, …` for `count` parameters following the leading `stock_id`.
fn placeholders(count: usize) -> String {
  (2..count + 2)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ")
}

impl Transaction for SqliteTx<'_> {
  type Error = Error;

  fn stock_id(&mut self, symbol: &str) -> Result<Option<i64>> {
    Ok(
      self
        .tx
        .query_row(
          "SELECT id FROM research_stocks WHERE symbol = ?1",
          rusqlite::params![symbol],
          |r| r.get(0),
        )
        .optional()?,
    )
  }

  fn upsert(&mut self, stock_id: i64, record: &SectionRecord) -> Result<WriteOutcome> {
    let kind = record.kind();
    let keys = kind.key_columns();
    let (names, values): (Vec<String>, Vec<_>) =
      encode_columns(record)?.into_iter().unzip();

    let conflict = std::iter::once("stock_id")
      .chain(keys.iter().copied())
      .collect::<Vec<_>>()
      .join(", ");
    let assignments = names
      .iter()
      .filter(|n| !keys.contains(&n.as_str()))
      .map(|n| format!("{n} = excluded.{n}"))
      .chain(std::iter::once("updated_at = CURRENT_TIMESTAMP".to_owned()))
      .collect::<Vec<_>>()
      .join(", ");

    let sql = format!(
      "INSERT INTO {table} (stock_id, {columns}) VALUES (?1, {params})
       ON CONFLICT ({conflict}) DO UPDATE SET {assignments}
       RETURNING id",
      table = table_name(kind),
      columns = names.join(", "),
      params = placeholders(names.len()),
    );

    let bound = std::iter::once(rusqlite::types::Value::Integer(stock_id)).chain(values);
    let id: i64 = self
      .tx
      .query_row(&sql, params_from_iter(bound), |r| r.get(0))?;

    Ok(WriteOutcome { id: Some(id), affected_rows: 1 })
  }

  fn update_by_stock(
    &mut self,
    stock_id: i64,
    record: &SectionRecord,
  ) -> Result<WriteOutcome> {
    let (names, values): (Vec<String>, Vec<_>) =
      encode_columns(record)?.into_iter().unzip();

    let assignments = names
      .iter()
      .enumerate()
      .map(|(i, n)| format!("{n} = ?{}", i + 2))
      .chain(std::iter::once("updated_at = CURRENT_TIMESTAMP".to_owned()))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE {table} SET {assignments} WHERE stock_id = ?1",
      table = table_name(record.kind()),
    );

    let bound = std::iter::once(rusqlite::types::Value::Integer(stock_id)).chain(values);
    let affected_rows = self.tx.execute(&sql, params_from_iter(bound))?;

    Ok(WriteOutcome { id: None, affected_rows })
  }

  fn commit(self) -> Result<()> {
    self.tx.commit()?;
    Ok(())
  }

  fn rollback(self) -> Result<()> {
    self.tx.rollback()?;
    Ok(())
  }
}
