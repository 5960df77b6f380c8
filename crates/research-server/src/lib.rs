//! HTTP server assembly for the stock research store.
//!
//! Wires [`research_api::api_router`] under `/api`, wraps it in request
//! tracing, and loads [`ServerConfig`] from a TOML file layered under
//! `RESEARCH_*` environment variables.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use research_core::store::ResearchStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
}

impl ServerConfig {
  /// Read `path` (if it exists), then `RESEARCH_*` environment variables on
  /// top, falling back to a local `research.db` on `127.0.0.1:3000`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .set_default("database_path", "research.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("RESEARCH"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn app<S: ResearchStore + 'static>(store: Arc<S>) -> Router {
  Router::new()
    .nest("/api", research_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
