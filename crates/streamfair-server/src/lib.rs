//! Streamfair HTTP server wiring.
//!
//! Holds the runtime configuration and assembles the application router; the
//! `streamfair` binary does the rest.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use serde::Deserialize;
use streamfair_core::store::CatalogStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `STREAMFAIR_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Deadline for the readiness ping, in milliseconds.
  #[serde(default = "default_ping_timeout_ms")]
  pub ping_timeout_ms: u64,
}

fn default_ping_timeout_ms() -> u64 { 2_000 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn ping_timeout(&self) -> Duration { Duration::from_millis(self.ping_timeout_ms) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API with request tracing.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: CatalogStore + 'static,
{
  Router::new()
    .merge(streamfair_api::api_router(store, config.ping_timeout()))
    .layer(TraceLayer::new_for_http())
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
