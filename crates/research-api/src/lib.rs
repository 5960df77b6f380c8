//! JSON REST API for the stock research store.
//!
//! Exposes an axum [`Router`] backed by any
//! [`research_core::store::ResearchStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", research_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod research;
pub mod stocks;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use research_core::store::ResearchStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ResearchStore + 'static,
{
  Router::new()
    // Research
    .route(
      "/research-details",
      post(research::create::<S>).put(research::update::<S>),
    )
    .route("/research-details/{stock_id}", get(research::show::<S>))
    // Stocks
    .route("/stocks", get(stocks::list::<S>).post(stocks::create::<S>))
    .route("/stocks/{id}", get(stocks::get_one::<S>))
    .with_state(store)
}
