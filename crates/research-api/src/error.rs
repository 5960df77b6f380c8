//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as a JSON object with a `message`. Validation failures
//! add the offending `errors`; server-side failures add the underlying
//! `error` text and are logged.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use research_core::payload::FieldError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed with {} error(s)", .0.len())]
  Validation(Vec<FieldError>),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("{context}: {source}")]
  Store {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store(
    context: &'static str,
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Store { context, source: Box::new(source) }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Validation(vec![FieldError::new("", rejection.body_text())])
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "message": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "message": m })),
      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        json!({ "message": "Validation failed", "errors": errors }),
      ),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "message": m })),
      ApiError::Store { context, source } => {
        tracing::error!(error = %source, "{context}");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "message": context, "error": source.to_string() }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
