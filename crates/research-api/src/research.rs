//! Handlers for `/research-details` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/research-details` | Upsert every present section; `201` |
//! | `PUT`  | `/research-details` | Same, reporting affected rows; `200` |
//! | `GET`  | `/research-details/:stock_id` | Latest row per section; 404 if no stock |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
};
use research_core::{
  engine::{ApplyError, ApplyReport, WriteMode},
  payload::ResearchPayload,
  store::ResearchStore,
};
use serde_json::{Map, Value, json};

use crate::error::ApiError;

const CREATED: &str = "Research details created successfully";
const UPDATED: &str = "Research details updated successfully";
const CREATE_FAILED: &str = "Failed to create research details";
const UPDATE_FAILED: &str = "Failed to update research details";
const FETCH_FAILED: &str = "Failed to fetch research details";

/// Validate the raw body before any storage access.
fn parse(body: Result<Json<Value>, JsonRejection>) -> Result<ResearchPayload, ApiError> {
  let Json(body) = body?;
  ResearchPayload::parse(&body).map_err(|invalid| ApiError::Validation(invalid.errors))
}

fn apply_error<E: std::error::Error + Send + Sync + 'static>(
  err: ApplyError<E>,
  context: &'static str,
) -> ApiError {
  match err {
    ApplyError::StockNotFound(symbol) => {
      ApiError::NotFound(format!("Stock with symbol '{symbol}' not found"))
    }
    other => ApiError::store(context, other),
  }
}

/// Echo each written section back, keyed by its payload name. Creates carry
/// the row `id`; updates carry `affectedRows`.
fn section_data(report: &ApplyReport, context: &'static str) -> Result<Value, ApiError> {
  let mut data = Map::new();
  for write in &report.sections {
    let mut columns = write
      .record
      .to_columns()
      .map_err(|e| ApiError::store(context, e))?;
    match report.mode {
      WriteMode::Create => columns.insert("id".into(), json!(write.id)),
      WriteMode::Update => {
        columns.insert("affectedRows".into(), json!(write.affected_rows))
      }
    };
    data.insert(write.record.kind().field_name().into(), Value::Object(columns));
  }
  Ok(Value::Object(data))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /research-details`
pub async fn create<S: ResearchStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
  let payload = parse(body)?;
  let report = store
    .apply_research(WriteMode::Create, payload)
    .await
    .map_err(|e| apply_error(e, CREATE_FAILED))?;

  let data = section_data(&report, CREATE_FAILED)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": CREATED, "data": data })),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /research-details`
pub async fn update<S: ResearchStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let payload = parse(body)?;
  let report = store
    .apply_research(WriteMode::Update, payload)
    .await
    .map_err(|e| apply_error(e, UPDATE_FAILED))?;

  let data = section_data(&report, UPDATE_FAILED)?;
  Ok(Json(json!({ "message": UPDATED, "data": data })))
}

// ─── Show ─────────────────────────────────────────────────────────────────────

/// `GET /research-details/:stock_id`
pub async fn show<S: ResearchStore>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
  let Path(stock_id) = path?;
  let snapshot = store
    .latest_research(stock_id)
    .await
    .map_err(|e| ApiError::store(FETCH_FAILED, e))?
    .ok_or_else(|| ApiError::NotFound(format!("Stock {stock_id} not found")))?;
  Ok(Json(json!({ "data": snapshot })))
}
