//! Integration tests for `SqliteStore` against an in-memory database.

use research_core::{
  engine::{ApplyError, WriteMode},
  payload::ResearchPayload,
  section::{
    BalanceSheet, Details, KeyMetrics, PerformancePeriod, RevenueMix, SectionKind,
    ShareholdingPattern,
  },
  stock::{NewStock, Stock},
  store::ResearchStore,
};
use serde_json::json;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn store_with(symbol: &str) -> (SqliteStore, Stock) {
  let s = store().await;
  let stock = s.register_stock(NewStock::new(symbol)).await.unwrap();
  (s, stock)
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

// ─── Stocks ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_get_stock() {
  let s = store().await;
  let stock = s
    .register_stock(NewStock {
      symbol:       "ACME".into(),
      company_name: Some("Acme Corp".into()),
      exchange:     Some("NSE".into()),
    })
    .await
    .unwrap();

  let fetched = s.get_stock(stock.id).await.unwrap().unwrap();
  assert_eq!(fetched, stock);
  assert_eq!(fetched.company_name.as_deref(), Some("Acme Corp"));
}

#[tokio::test]
async fn get_stock_missing_returns_none() {
  let s = store().await;
  assert!(s.get_stock(999).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_symbol_is_rejected() {
  let (s, _) = store_with("ACME").await;
  let err = s.register_stock(NewStock::new("ACME")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateSymbol(ref sym) if sym == "ACME"));
}

#[tokio::test]
async fn stocks_are_listed_by_symbol() {
  let s = store().await;
  for symbol in ["ZETA", "ACME", "MIDCO"] {
    s.register_stock(NewStock::new(symbol)).await.unwrap();
  }
  let symbols: Vec<_> = s
    .list_stocks()
    .await
    .unwrap()
    .into_iter()
    .map(|st| st.symbol)
    .collect();
  assert_eq!(symbols, ["ACME", "MIDCO", "ZETA"]);
}

// ─── Upserts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_read_back() {
  let (s, stock) = store_with("ACME").await;
  let report = s
    .apply_research(
      WriteMode::Create,
      payload(json!({
        "stock": { "symbol": "ACME" },
        "balance_sheet": { "fiscal_year": 2024, "equity_capital": 100.5 },
        "shareholding_pattern": {
          "period_month": 3,
          "period_year": 2024,
          "promoter_holding": 55.25
        }
      })),
    )
    .await
    .unwrap();
  assert_eq!(report.sections.len(), 2);

  let snapshot = s.latest_research(stock.id).await.unwrap().unwrap();
  let stored = snapshot.balance_sheet.unwrap();
  assert_eq!(Some(stored.id), report.sections[0].id);
  assert_eq!(stored.values, sheet(2024, 100.5));
  assert_eq!(
    snapshot.shareholding_pattern.unwrap().values,
    ShareholdingPattern {
      period_month: Some(3),
      period_year: Some(2024),
      promoter_holding: Some(55.25),
      ..Default::default()
    }
  );
  assert!(snapshot.details.is_none());
}

#[tokio::test]
async fn repeated_create_keeps_one_row() {
  let (s, stock) = store_with("ACME").await;
  let mut body = ResearchPayload::for_symbol("ACME");
  body.balance_sheet = Some(sheet(2024, 100.5));

  let first = s.apply_research(WriteMode::Create, body.clone()).await.unwrap();
  let second = s.apply_research(WriteMode::Create, body).await.unwrap();

  assert_eq!(first.sections[0].id, second.sections[0].id);
  assert_eq!(s.count(SectionKind::BalanceSheet).await.unwrap(), 1);
  let snapshot = s.latest_research(stock.id).await.unwrap().unwrap();
  assert_eq!(snapshot.balance_sheet.unwrap().values.equity_capital, Some(100.5));
}

#[tokio::test]
async fn distinct_natural_keys_get_distinct_rows() {
  let (s, _) = store_with("ACME").await;
  for category in ["Cloud", "Hardware"] {
    let mut body = ResearchPayload::for_symbol("ACME");
    body.revenue_mix = Some(RevenueMix {
      fiscal_year: Some(2024),
      mix_type: Some("segment".into()),
      category: Some(category.into()),
      percentage: Some(50.0),
      ..Default::default()
    });
    s.apply_research(WriteMode::Create, body).await.unwrap();
  }
  assert_eq!(s.count(SectionKind::RevenueMix).await.unwrap(), 2);
}

#[tokio::test]
async fn update_replaces_every_non_key_column() {
  let (s, stock) = store_with("ACME").await;
  let mut body = ResearchPayload::for_symbol("ACME");
  body.balance_sheet = Some(BalanceSheet {
    total_assets: Some(5000.0),
    is_consolidated: Some(true),
    ..sheet(2024, 100.5)
  });
  s.apply_research(WriteMode::Create, body.clone()).await.unwrap();

  body.balance_sheet = Some(sheet(2024, 200.0));
  let report = s.apply_research(WriteMode::Update, body).await.unwrap();
  assert_eq!(report.sections[0].id, None);
  assert_eq!(report.sections[0].affected_rows, 1);

  let stored = s
    .latest_research(stock.id)
    .await
    .unwrap()
    .unwrap()
    .balance_sheet
    .unwrap()
    .values;
  assert_eq!(stored, sheet(2024, 200.0));
}

// ─── Details ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn details_update_without_a_row_affects_nothing() {
  let (s, _) = store_with("ACME").await;
  let report = s
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
  assert_eq!(s.count(SectionKind::Details).await.unwrap(), 0);
}

#[tokio::test]
async fn details_create_then_update() {
  let (s, stock) = store_with("ACME").await;
  s.apply_research(
    WriteMode::Create,
    payload(json!({
      "stock": { "symbol": "ACME" },
      "details": { "report_date": "2024-01-15", "rating": "BUY", "is_published": true }
    })),
  )
  .await
  .unwrap();

  let report = s
    .apply_research(
      WriteMode::Update,
      payload(json!({
        "stock": { "symbol": "ACME" },
        "details": { "report_date": "2024-02-01", "rating": "HOLD" }
      })),
    )
    .await
    .unwrap();
  assert_eq!(report.sections[0].affected_rows, 1);

  let details = s
    .latest_research(stock.id)
    .await
    .unwrap()
    .unwrap()
    .details
    .unwrap()
    .values;
  assert_eq!(details, Details {
    report_date: Some("2024-02-01".into()),
    rating: Some("HOLD".into()),
    ..Default::default()
  });
}

// ─── Atomicity and gating ────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_symbol_writes_nothing() {
  let (s, _) = store_with("ACME").await;
  let err = s
    .apply_research(
      WriteMode::Create,
      payload(json!({
        "stock": { "symbol": "NOSUCH" },
        "details": { "report_date": "2024-01-01" }
      })),
    )
    .await
    .unwrap_err();

  assert!(matches!(err, ApplyError::StockNotFound(ref sym) if sym == "NOSUCH"));
  assert_eq!(s.count(SectionKind::Details).await.unwrap(), 0);
}

#[tokio::test]
async fn failing_section_rolls_back_the_whole_request() {
  let (s, stock) = store_with("ACME").await;
  let mut body = ResearchPayload::for_symbol("ACME");
  body.balance_sheet = Some(sheet(2024, 100.5));
  s.apply_research(WriteMode::Create, body.clone()).await.unwrap();

  s.exec(
    "CREATE TRIGGER reject_revenue_mix BEFORE INSERT ON research_revenue_mix
     BEGIN SELECT RAISE(ABORT, 'revenue mix rejected'); END;",
  )
  .await
  .unwrap();

  body.balance_sheet = Some(sheet(2024, 999.0));
  body.revenue_mix = Some(RevenueMix {
    fiscal_year: Some(2024),
    mix_type: Some("segment".into()),
    category: Some("Cloud".into()),
    ..Default::default()
  });
  let err = s.apply_research(WriteMode::Create, body).await.unwrap_err();
  assert!(matches!(
    err,
    ApplyError::Section { section: SectionKind::RevenueMix, .. }
  ));

  let snapshot = s.latest_research(stock.id).await.unwrap().unwrap();
  assert_eq!(snapshot.balance_sheet.unwrap().values.equity_capital, Some(100.5));
  assert_eq!(s.count(SectionKind::RevenueMix).await.unwrap(), 0);

  // The connection is usable again after the rollback.
  let mut body = ResearchPayload::for_symbol("ACME");
  body.balance_sheet = Some(sheet(2025, 1.0));
  s.apply_research(WriteMode::Create, body).await.unwrap();
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_row_follows_the_temporal_key() {
  let (s, stock) = store_with("ACME").await;
  for year in [2023, 2025, 2024] {
    let mut body = ResearchPayload::for_symbol("ACME");
    body.balance_sheet = Some(sheet(year, f64::from(year)));
    s.apply_research(WriteMode::Create, body).await.unwrap();
  }
  for (month, year) in [(12, 2023), (3, 2024), (9, 2023)] {
    let mut body = ResearchPayload::for_symbol("ACME");
    body.shareholding_pattern = Some(ShareholdingPattern {
      period_month: Some(month),
      period_year: Some(year),
      ..Default::default()
    });
    s.apply_research(WriteMode::Create, body).await.unwrap();
  }

  let snapshot = s.latest_research(stock.id).await.unwrap().unwrap();
  assert_eq!(snapshot.balance_sheet.unwrap().values.fiscal_year, Some(2025));
  let holding = snapshot.shareholding_pattern.unwrap().values;
  assert_eq!((holding.period_month, holding.period_year), (Some(3), Some(2024)));
}

#[tokio::test]
async fn dates_read_back_without_time_component() {
  let (s, stock) = store_with("ACME").await;
  s.exec(
    "INSERT INTO research_key_metrics (stock_id, snapshot_date, beta)
     VALUES (1, '2024-03-31 00:00:00', 1.1);
     INSERT INTO research_performance_metrics (stock_id, period_type, as_of_date)
     VALUES (1, '1Y', '2024-04-01T10:15:00Z');",
  )
  .await
  .unwrap();

  let snapshot = s.latest_research(stock.id).await.unwrap().unwrap();
  assert_eq!(
    snapshot.key_metrics.unwrap().values,
    KeyMetrics {
      snapshot_date: Some("2024-03-31".into()),
      beta: Some(1.1),
      ..Default::default()
    }
  );
  let perf = snapshot.performance_metrics.unwrap().values;
  assert_eq!(perf.as_of_date.as_deref(), Some("2024-04-01"));
  assert_eq!(perf.period_type, Some(PerformancePeriod::OneYear));
}

#[tokio::test]
async fn latest_for_unknown_stock_is_none() {
  let s = store().await;
  assert!(s.latest_research(42).await.unwrap().is_none());
}

#[tokio::test]
async fn open_file_store_persists_across_reopen() {
  let dir = std::env::temp_dir().join(format!("research-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("research.db");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.register_stock(NewStock::new("ACME")).await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list_stocks().await.unwrap().len(), 1);

  let _ = std::fs::remove_dir_all(&dir);
}
