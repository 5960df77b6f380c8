//! [`SqliteStore`], the SQLite implementation of [`ResearchStore`].

use std::path::Path;

use chrono::Utc;
use research_core::{
  engine::{self, ApplyError, ApplyReport, WriteMode},
  payload::ResearchPayload,
  section::{SectionKind, SectionRecord},
  snapshot::ResearchSnapshot,
  stock::{NewStock, Stock},
  store::ResearchStore,
};
use rusqlite::OptionalExtension as _;
use tracing::info;

use crate::{
  Error, Result,
  encode::{RawStock, decode_row, encode_dt, table_name},
  schema::SCHEMA,
  unit::SqliteUnit,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A research store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the store; lets tests plant triggers and odd rows.
  #[cfg(test)]
  pub(crate) async fn exec(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows in the table backing `kind`.
  #[cfg(test)]
  pub(crate) async fn count(&self, kind: SectionKind) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table_name(kind));
    Ok(
      self
        .conn
        .call(move |conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
        .await?,
    )
  }
}

fn insert_stock(conn: &rusqlite::Connection, input: &NewStock) -> Result<i64> {
  let inserted = conn.execute(
    "INSERT INTO research_stocks (symbol, company_name, exchange, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      input.symbol,
      input.company_name,
      input.exchange,
      encode_dt(Utc::now()),
    ],
  );
  match inserted {
    Ok(_) => Ok(conn.last_insert_rowid()),
    Err(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      Err(Error::DuplicateSymbol(input.symbol.clone()))
    }
    Err(e) => Err(e.into()),
  }
}

/// The newest row of every section owned by `stock_id`.
fn latest_rows(conn: &rusqlite::Connection, stock_id: i64) -> Result<Vec<(i64, SectionRecord)>> {
  let mut found = Vec::new();
  for kind in SectionKind::ALL {
    let order = kind
      .recency_columns()
      .iter()
      .map(|c| format!("{c} DESC"))
      .chain(["updated_at DESC".to_owned(), "id DESC".to_owned()])
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "SELECT * FROM {table} WHERE stock_id = ?1 ORDER BY {order} LIMIT 1",
      table = table_name(kind),
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params![stock_id])?;
    if let Some(row) = rows.next()? {
      found.push(decode_row(kind, row)?);
    }
  }
  Ok(found)
}

// ─── ResearchStore impl ──────────────────────────────────────────────────────

impl ResearchStore for SqliteStore {
  type Error = Error;

  // ── Stocks ────────────────────────────────────────────────────────────────

  async fn register_stock(&self, input: NewStock) -> Result<Stock> {
    let symbol = input.symbol.clone();
    let id = self
      .conn
      .call(move |conn| Ok(insert_stock(conn, &input)))
      .await??;
    info!(id, %symbol, "stock registered");

    self
      .get_stock(id)
      .await?
      .ok_or(Error::Core(research_core::Error::StockNotFound(id)))
  }

  async fn get_stock(&self, id: i64) -> Result<Option<Stock>> {
    let raw: Option<RawStock> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM research_stocks WHERE id = ?1", RawStock::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawStock::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStock::into_stock).transpose()
  }

  async fn list_stocks(&self) -> Result<Vec<Stock>> {
    let raws: Vec<RawStock> = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {} FROM research_stocks ORDER BY symbol", RawStock::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawStock::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStock::into_stock).collect()
  }

  // ── Research ──────────────────────────────────────────────────────────────

  async fn apply_research(
    &self,
    mode: WriteMode,
    payload: ResearchPayload,
  ) -> Result<ApplyReport, ApplyError<Error>> {
    self
      .conn
      .call(move |conn| Ok(engine::run(&mut SqliteUnit::new(conn), mode, &payload)))
      .await
      .map_err(|e| ApplyError::Store(Error::Database(e)))?
  }

  async fn latest_research(&self, stock_id: i64) -> Result<Option<ResearchSnapshot>> {
    let Some(stock) = self.get_stock(stock_id).await? else {
      return Ok(None);
    };

    let rows = self
      .conn
      .call(move |conn| Ok(latest_rows(conn, stock_id)))
      .await??;

    let mut snapshot = ResearchSnapshot::new(stock);
    for (id, record) in rows {
      snapshot.insert(id, record);
    }
    Ok(Some(snapshot))
  }
}
