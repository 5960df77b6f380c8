//! Handlers for `/stocks` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stocks` | Ordered by symbol |
//! | `POST` | `/stocks` | Body: `{"symbol":"ACME"}`; 409 if taken |
//! | `GET`  | `/stocks/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use research_core::{
  payload::field_errors,
  stock::{NewStock, Stock},
  store::{ResearchStore, StoreError as _},
};
use validator::Validate as _;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /stocks`
pub async fn list<S: ResearchStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Stock>>, ApiError> {
  let stocks = store
    .list_stocks()
    .await
    .map_err(|e| ApiError::store("Failed to list stocks", e))?;
  Ok(Json(stocks))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /stocks`, body: `{"symbol":"ACME","company_name":"Acme Corp"}`
pub async fn create<S: ResearchStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewStock>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  input
    .validate()
    .map_err(|e| ApiError::Validation(field_errors(None, &e)))?;

  let symbol = input.symbol.clone();
  let stock = store.register_stock(input).await.map_err(|e| {
    if e.is_duplicate_symbol() {
      ApiError::Conflict(format!("Stock with symbol '{symbol}' already exists"))
    } else {
      ApiError::store("Failed to create stock", e)
    }
  })?;
  Ok((StatusCode::CREATED, Json(stock)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /stocks/:id`
pub async fn get_one<S: ResearchStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Stock>, ApiError> {
  let Path(id) = path?;
  let stock = store
    .get_stock(id)
    .await
    .map_err(|e| ApiError::store("Failed to fetch stock", e))?
    .ok_or_else(|| ApiError::NotFound(format!("Stock {id} not found")))?;
  Ok(Json(stock))
}
