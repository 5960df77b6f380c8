//! End-to-end tests: the full router over an in-memory SQLite store.

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use research_core::{stock::NewStock, store::ResearchStore};
use research_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ServerConfig, app, expand_tilde};

async fn acme() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.register_stock(NewStock::new("ACME")).await.unwrap();
  app(Arc::new(store))
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  let resp = router
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// ─── Scenario ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn balance_sheet_create_is_idempotent_and_readable() {
  let router = acme().await;
  let body = json!({
    "stock": { "symbol": "ACME" },
    "balance_sheet": { "fiscal_year": 2024, "equity_capital": 100.5 }
  });

  let (status, first) = call(&router, "POST", "/api/research-details", Some(body.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  let (status, second) = call(&router, "POST", "/api/research-details", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(
    first["data"]["balance_sheet"]["id"],
    second["data"]["balance_sheet"]["id"]
  );

  let (status, read) = call(&router, "GET", "/api/research-details/1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(read["data"]["balance_sheet"]["equity_capital"], 100.5);
  assert_eq!(
    read["data"]["balance_sheet"]["id"],
    first["data"]["balance_sheet"]["id"]
  );
}

#[tokio::test]
async fn unknown_symbol_is_404_and_writes_nothing() {
  let router = acme().await;
  let (status, body) = call(
    &router,
    "POST",
    "/api/research-details",
    Some(json!({
      "stock": { "symbol": "NOSUCH" },
      "details": { "report_date": "2024-01-01" }
    })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "Stock with symbol 'NOSUCH' not found");

  let (_, read) = call(&router, "GET", "/api/research-details/1", None).await;
  assert!(read["data"]["details"].is_null());
}

#[tokio::test]
async fn under_keyed_revenue_mix_is_400() {
  let router = acme().await;
  let (status, body) = call(
    &router,
    "POST",
    "/api/research-details",
    Some(json!({
      "stock": { "symbol": "ACME" },
      "revenue_mix": { "percentage": 50 }
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let paths: Vec<_> = body["errors"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["path"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(paths, [
    "revenue_mix.category",
    "revenue_mix.fiscal_year",
    "revenue_mix.mix_type",
  ]);
}

#[tokio::test]
async fn details_update_round_trip() {
  let router = acme().await;
  let (status, body) = call(
    &router,
    "PUT",
    "/api/research-details",
    Some(json!({
      "stock": { "symbol": "ACME" },
      "details": { "rating": "BUY" }
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["details"]["affectedRows"], 0);

  call(
    &router,
    "POST",
    "/api/research-details",
    Some(json!({
      "stock": { "symbol": "ACME" },
      "details": { "report_date": "2024-05-01", "rating": "BUY" }
    })),
  )
  .await;
  let (_, body) = call(
    &router,
    "PUT",
    "/api/research-details",
    Some(json!({
      "stock": { "symbol": "ACME" },
      "details": { "report_date": "2024-06-01", "rating": "SELL" }
    })),
  )
  .await;
  assert_eq!(body["data"]["details"]["affectedRows"], 1);

  let (_, read) = call(&router, "GET", "/api/research-details/1", None).await;
  assert_eq!(read["data"]["details"]["rating"], "SELL");
  assert_eq!(read["data"]["details"]["report_date"], "2024-06-01");
}

#[tokio::test]
async fn stocks_are_served_under_api() {
  let router = acme().await;
  let (status, list) = call(&router, "GET", "/api/stocks", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list[0]["symbol"], "ACME");

  let (status, _) = call(
    &router,
    "POST",
    "/api/stocks",
    Some(json!({ "symbol": "ACME" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

// ─── Configuration ────────────────────────────────────────────────────────────

#[test]
fn config_file_overrides_defaults() {
  let dir = std::env::temp_dir().join(format!("research-config-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("config.toml");
  std::fs::write(&path, "port = 8080\ndatabase_path = \"~/research.db\"\n").unwrap();

  let cfg = ServerConfig::load(&path).unwrap();
  assert_eq!(cfg.host, "127.0.0.1");
  assert_eq!(cfg.port, 8080);
  assert_eq!(cfg.address(), "127.0.0.1:8080");

  let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_config_file_uses_defaults() {
  let cfg = ServerConfig::load(Path::new("/nonexistent/research.toml")).unwrap();
  assert_eq!(cfg.port, 3000);
  assert_eq!(cfg.database_path, Path::new("research.db"));
}

#[test]
fn tilde_expands_to_home() {
  let Ok(home) = std::env::var("HOME") else { return };
  assert_eq!(
    expand_tilde(Path::new("~/research.db")),
    Path::new(&home).join("research.db")
  );
  assert_eq!(expand_tilde(Path::new("/tmp/x.db")), Path::new("/tmp/x.db"));
}
