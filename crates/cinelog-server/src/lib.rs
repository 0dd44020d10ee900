//! Process wiring for the Cinelog HTTP server.
//!
//! Holds the runtime configuration and assembles the traced router that
//! `main` serves.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use cinelog_core::store::CineStore;
use cinelog_service::Service;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// The store path that selects a fresh in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Runtime server configuration, deserialised from `config.toml` and
/// `CINELOG_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("cinelog.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn is_in_memory(&self) -> bool { self.store_path.as_os_str() == IN_MEMORY }
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

/// The full application: the JSON API wrapped in request tracing.
pub fn app<S>(service: Arc<Service<S>>) -> Router
where
  S: CineStore + 'static,
{
  cinelog_api::api_router(service).layer(TraceLayer::new_for_http())
}
