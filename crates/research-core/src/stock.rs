//! Stock, the parent entity every research section hangs off.
//!
//! Stocks are registered outside the upsert engine. The engine only resolves
//! a symbol to the surrogate id and never creates or deletes a stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A tracked security, identified by its unique `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
  pub id:           i64,
  pub symbol:       String,
  pub company_name: Option<String>,
  pub exchange:     Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ResearchStore::register_stock`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStock {
  #[validate(length(min = 1, max = 45))]
  pub symbol:       String,
  #[validate(length(max = 255))]
  pub company_name: Option<String>,
  #[validate(length(max = 20))]
  pub exchange:     Option<String>,
}

impl NewStock {
  pub fn new(symbol: impl Into<String>) -> Self {
    Self { symbol: symbol.into(), company_name: None, exchange: None }
  }
}

/// The parent reference carried by a research payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRef {
  pub symbol: String,
}
