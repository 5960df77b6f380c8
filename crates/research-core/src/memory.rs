//! [`MemoryStore`]: an in-process [`ResearchStore`] backed by plain vectors.
//!
//! Transactions work on a copy of the tables and swap it in on commit, so a
//! dropped or rolled-back transaction leaves no trace. Writes to a chosen
//! section can be rigged to fail, which makes rollback behaviour testable
//! without a real database.

use std::{
  cmp::Ordering,
  sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  engine::{self, ApplyError, ApplyReport, WriteMode},
  payload::ResearchPayload,
  section::{SectionKind, SectionRecord},
  snapshot::ResearchSnapshot,
  stock::{NewStock, Stock},
  store::ResearchStore,
  unit::{Transaction, UnitOfWork, WriteOutcome},
};

// ─── Tables ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Row {
  id:       i64,
  /// Write sequence number; breaks recency ties like `updated_at` would.
  seq:      u64,
  stock_id: i64,
  kind:     SectionKind,
  columns:  Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
struct Tables {
  stocks:  Vec<Stock>,
  rows:    Vec<Row>,
  last_id: i64,
  seq:     u64,
  reject:  Option<SectionKind>,
}

impl Tables {
  fn next_id(&mut self) -> i64 {
    self.last_id += 1;
    self.last_id
  }

  fn next_seq(&mut self) -> u64 {
    self.seq += 1;
    self.seq
  }

  fn check_reject(&self, kind: SectionKind) -> Result<()> {
    match self.reject {
      Some(rejected) if rejected == kind => Err(Error::WriteRejected(kind)),
      _ => Ok(()),
    }
  }
}

/// A transaction over a working copy of [`Tables`].
struct MemoryTx<'a> {
  committed: &'a mut Tables,
  working:   Tables,
}

impl UnitOfWork for Tables {
  type Error = Error;
  type Tx<'a>
    = MemoryTx<'a>
  where
    Self: 'a;

  fn begin(&mut self) -> Result<MemoryTx<'_>> {
    let working = self.clone();
    Ok(MemoryTx { committed: self, working })
  }
}

impl Transaction for MemoryTx<'_> {
  type Error = Error;

  fn stock_id(&mut self, symbol: &str) -> Result<Option<i64>> {
    Ok(
      self
        .working
        .stocks
        .iter()
        .find(|s| s.symbol == symbol)
        .map(|s| s.id),
    )
  }

  fn upsert(&mut self, stock_id: i64, record: &SectionRecord) -> Result<WriteOutcome> {
    let kind = record.kind();
    self.working.check_reject(kind)?;
    let columns = record.to_columns()?;
    let seq = self.working.next_seq();

    let key = kind.key_columns();
    let existing = self.working.rows.iter_mut().find(|r| {
      r.stock_id == stock_id
        && r.kind == kind
        && key.iter().all(|c| r.columns.get(*c) == columns.get(*c))
    });
    if let Some(row) = existing {
      row.columns = columns;
      row.seq = seq;
      return Ok(WriteOutcome { id: Some(row.id), affected_rows: 1 });
    }

    let id = self.working.next_id();
    self.working.rows.push(Row { id, seq, stock_id, kind, columns });
    Ok(WriteOutcome { id: Some(id), affected_rows: 1 })
  }

  fn update_by_stock(
    &mut self,
    stock_id: i64,
    record: &SectionRecord,
  ) -> Result<WriteOutcome> {
    let kind = record.kind();
    self.working.check_reject(kind)?;
    let columns = record.to_columns()?;
    let seq = self.working.next_seq();

    let mut affected_rows = 0;
    for row in &mut self.working.rows {
      if row.stock_id == stock_id && row.kind == kind {
        row.columns = columns.clone();
        row.seq = seq;
        affected_rows += 1;
      }
    }
    Ok(WriteOutcome { id: None, affected_rows })
  }

  fn commit(self) -> Result<()> {
    *self.committed = self.working;
    Ok(())
  }

  fn rollback(self) -> Result<()> { Ok(()) }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An in-memory research store. Not persistent; meant for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent write to `kind` fail (or stop failing, with
  /// `None`).
  pub fn reject_writes_to(&self, kind: Option<SectionKind>) -> Result<()> {
    self.lock()?.reject = kind;
    Ok(())
  }

  /// Number of stored rows for `kind`, across all stocks.
  pub fn row_count(&self, kind: SectionKind) -> Result<usize> {
    Ok(self.lock()?.rows.iter().filter(|r| r.kind == kind).count())
  }

  fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
    self.tables.lock().map_err(|_| Error::Poisoned)
  }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
  match (a, b) {
    (Value::Number(x), Value::Number(y)) => {
      x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
    }
    (Value::String(x), Value::String(y)) => x.cmp(y),
    (Value::Null, Value::Null) => Ordering::Equal,
    (Value::Null, _) => Ordering::Less,
    (_, Value::Null) => Ordering::Greater,
    _ => Ordering::Equal,
  }
}

/// Orders rows oldest to newest by the section's recency columns, then by
/// write sequence.
fn recency(kind: SectionKind, a: &Row, b: &Row) -> Ordering {
  kind
    .recency_columns()
    .iter()
    .map(|c| {
      compare_values(
        a.columns.get(*c).unwrap_or(&Value::Null),
        b.columns.get(*c).unwrap_or(&Value::Null),
      )
    })
    .find(|o| o.is_ne())
    .unwrap_or(Ordering::Equal)
    .then(a.seq.cmp(&b.seq))
}

impl ResearchStore for MemoryStore {
  type Error = Error;

  async fn register_stock(&self, input: NewStock) -> Result<Stock> {
    let mut tables = self.lock()?;
    if tables.stocks.iter().any(|s| s.symbol == input.symbol) {
      return Err(Error::DuplicateSymbol(input.symbol));
    }
    let stock = Stock {
      id:           tables.next_id(),
      symbol:       input.symbol,
      company_name: input.company_name,
      exchange:     input.exchange,
      created_at:   Utc::now(),
    };
    tables.stocks.push(stock.clone());
    Ok(stock)
  }

  async fn get_stock(&self, id: i64) -> Result<Option<Stock>> {
    Ok(self.lock()?.stocks.iter().find(|s| s.id == id).cloned())
  }

  async fn list_stocks(&self) -> Result<Vec<Stock>> {
    let mut stocks = self.lock()?.stocks.clone();
    stocks.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(stocks)
  }

  async fn apply_research(
    &self,
    mode: WriteMode,
    payload: ResearchPayload,
  ) -> Result<ApplyReport, ApplyError<Error>> {
    let mut tables = self.lock().map_err(ApplyError::Store)?;
    engine::run(&mut *tables, mode, &payload)
  }

  async fn latest_research(&self, stock_id: i64) -> Result<Option<ResearchSnapshot>> {
    let tables = self.lock()?;
    let Some(stock) = tables.stocks.iter().find(|s| s.id == stock_id).cloned()
    else {
      return Ok(None);
    };

    let mut snapshot = ResearchSnapshot::new(stock);
    for kind in SectionKind::ALL {
      let latest = tables
        .rows
        .iter()
        .filter(|r| r.stock_id == stock_id && r.kind == kind)
        .max_by(|a, b| recency(kind, a, b));
      if let Some(row) = latest {
        snapshot.insert(row.id, SectionRecord::from_columns(kind, row.columns.clone())?);
      }
    }
    Ok(Some(snapshot))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::section::{BalanceSheet, Details, RevenueMix};

  async fn store_with(symbol: &str) -> (MemoryStore, Stock) {
    let store = MemoryStore::new();
    let stock = store.register_stock(NewStock::new(symbol)).await.unwrap();
    (store, stock)
  }

  fn payload(body: serde_json::Value) -> ResearchPayload {
    ResearchPayload::parse(&body).unwrap()
  }

  fn sheet(year: i32, equity: f64) -> BalanceSheet {
    BalanceSheet {
      fiscal_year: Some(year),
      equity_capital: Some(equity),
      ..Default::default()
    }
  }

  // ─── Create ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_reports_ids_per_section() {
    let (store, stock) = store_with("ACME").await;

    let report = store
      .apply_research(
        WriteMode::Create,
        payload(json!({
          "stock": { "symbol": "ACME" },
          "balance_sheet": { "fiscal_year": 2024, "equity_capital": 100.5 },
          "details": { "report_date": "2024-01-01", "rating": "BUY" }
        })),
      )
      .await
      .unwrap();

    assert_eq!(report.stock_id, stock.id);
    assert_eq!(report.sections.len(), 2);
    assert!(report.sections.iter().all(|s| s.id.is_some()));
    assert!(report.sections.iter().all(|s| s.affected_rows == 1));
  }

  #[tokio::test]
  async fn repeated_create_overwrites_instead_of_duplicating() {
    let (store, stock) = store_with("ACME").await;
    let mut body = ResearchPayload::for_symbol("ACME");
    body.balance_sheet = Some(sheet(2024, 100.5));

    let first = store
      .apply_research(WriteMode::Create, body.clone())
      .await
      .unwrap();
    let second = store.apply_research(WriteMode::Create, body).await.unwrap();

    assert_eq!(first.sections[0].id, second.sections[0].id);
    assert_eq!(second.sections[0].affected_rows, 1);
    assert_eq!(store.row_count(SectionKind::BalanceSheet).unwrap(), 1);

    let snapshot = store.latest_research(stock.id).await.unwrap().unwrap();
    assert_eq!(snapshot.balance_sheet.unwrap().values, sheet(2024, 100.5));
  }

  #[tokio::test]
  async fn non_key_columns_are_overwritten_with_nulls() {
    let (store, stock) = store_with("ACME").await;
    let mut body = ResearchPayload::for_symbol("ACME");
    body.balance_sheet = Some(BalanceSheet {
      total_assets: Some(5000.0),
      ..sheet(2024, 100.5)
    });
    store.apply_research(WriteMode::Create, body.clone()).await.unwrap();

    body.balance_sheet = Some(sheet(2024, 200.0));
    store.apply_research(WriteMode::Create, body).await.unwrap();

    let snapshot = store.latest_research(stock.id).await.unwrap().unwrap();
    let stored = snapshot.balance_sheet.unwrap().values;
    assert_eq!(stored.equity_capital, Some(200.0));
    assert_eq!(stored.total_assets, None);
  }

  // ─── Parent gating ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_symbol_writes_nothing() {
    let (store, _) = store_with("ACME").await;
    let mut body = ResearchPayload::for_symbol("NOSUCH");
    body.details = Some(Details {
      report_date: Some("2024-01-01".into()),
      ..Default::default()
    });

    let err = store
      .apply_research(WriteMode::Create, body)
      .await
      .unwrap_err();
    assert!(matches!(err, ApplyError::StockNotFound(ref s) if s == "NOSUCH"));
    assert_eq!(store.row_count(SectionKind::Details).unwrap(), 0);
  }

  // ─── Atomicity ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn failing_section_rolls_back_earlier_sections() {
    let (store, stock) = store_with("ACME").await;
    let mut body = ResearchPayload::for_symbol("ACME");
    body.balance_sheet = Some(sheet(2024, 100.5));
    store.apply_research(WriteMode::Create, body.clone()).await.unwrap();

    store.reject_writes_to(Some(SectionKind::RevenueMix)).unwrap();
    body.balance_sheet = Some(sheet(2024, 999.0));
    body.revenue_mix = Some(RevenueMix {
      fiscal_year: Some(2024),
      mix_type: Some("segment".into()),
      category: Some("Cloud".into()),
      percentage: Some(50.0),
      ..Default::default()
    });

    let err = store
      .apply_research(WriteMode::Update, body)
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      ApplyError::Section { section: SectionKind::RevenueMix, .. }
    ));

    let snapshot = store.latest_research(stock.id).await.unwrap().unwrap();
    assert_eq!(snapshot.balance_sheet.unwrap().values, sheet(2024, 100.5));
    assert!(snapshot.revenue_mix.is_none());
  }

  // ─── Independence ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn single_section_payload_leaves_others_untouched() {
    let (store, stock) = store_with("ACME").await;
    store
      .apply_research(
        WriteMode::Create,
        payload(json!({
          "stock": { "symbol": "ACME" },
          "balance_sheet": { "fiscal_year": 2024, "equity_capital": 1 },
          "key_metrics": { "snapshot_date": "2024-03-31", "beta": 1.2 }
        })),
      )
      .await
      .unwrap();
    let before = store.latest_research(stock.id).await.unwrap().unwrap();

    store
      .apply_research(
        WriteMode::Update,
        payload(json!({
          "stock": { "symbol": "ACME" },
          "balance_sheet": { "fiscal_year": 2024, "equity_capital": 2 }
        })),
      )
      .await
      .unwrap();
    let after = store.latest_research(stock.id).await.unwrap().unwrap();

    assert_eq!(after.key_metrics, before.key_metrics);
    assert_eq!(after.balance_sheet.unwrap().values.equity_capital, Some(2.0));
  }

  // ─── Update path ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_of_missing_details_affects_no_rows() {
    let (store, _) = store_with("ACME").await;
    let report = store
      .apply_research(
        WriteMode::Update,
        payload(json!({
          "stock": { "symbol": "ACME" },
          "details": { "rating": "HOLD" }
        })),
      )
      .await
      .unwrap();

    assert_eq!(report.sections[0].affected_rows, 0);
    assert_eq!(report.sections[0].id, None);
    assert_eq!(store.row_count(SectionKind::Details).unwrap(), 0);
  }

  #[tokio::test]
  async fn update_overwrites_existing_details() {
    let (store, stock) = store_with("ACME").await;
    let create = payload(json!({
      "stock": { "symbol": "ACME" },
      "details": { "rating": "BUY", "target_price": 120 }
    }));
    store.apply_research(WriteMode::Create, create).await.unwrap();

    let update = payload(json!({
      "stock": { "symbol": "ACME" },
      "details": { "rating": "HOLD" }
    }));
    let report = store.apply_research(WriteMode::Update, update).await.unwrap();
    assert_eq!(report.sections[0].affected_rows, 1);

    let details = store
      .latest_research(stock.id)
      .await
      .unwrap()
      .unwrap()
      .details
      .unwrap()
      .values;
    assert_eq!(details.rating.as_deref(), Some("HOLD"));
    assert_eq!(details.target_price, None);
  }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn latest_picks_highest_fiscal_year() {
    let (store, stock) = store_with("ACME").await;
    for (year, equity) in [(2023, 1.0), (2025, 3.0), (2024, 2.0)] {
      let mut body = ResearchPayload::for_symbol("ACME");
      body.balance_sheet = Some(sheet(year, equity));
      store.apply_research(WriteMode::Create, body).await.unwrap();
    }

    let snapshot = store.latest_research(stock.id).await.unwrap().unwrap();
    assert_eq!(snapshot.balance_sheet.unwrap().values, sheet(2025, 3.0));
  }

  #[tokio::test]
  async fn latest_for_unknown_stock_is_none() {
    let store = MemoryStore::new();
    assert!(store.latest_research(42).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn duplicate_symbol_is_rejected() {
    let (store, _) = store_with("ACME").await;
    let err = store.register_stock(NewStock::new("ACME")).await.unwrap_err();
    assert!(matches!(err, Error::DuplicateSymbol(_)));
    assert_eq!(store.list_stocks().await.unwrap().len(), 1);
  }
}
