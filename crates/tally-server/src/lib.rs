//! tally server wiring: configuration, catalog seeding, and the top-level
//! router. The binary in `main.rs` stays thin.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tally_core::{leave::NewLeaveType, store::WorkforceStore};
use tally_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// One leave type to ensure exists at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypeConfig {
  pub name:         String,
  pub default_days: u32,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `TALLY_`-prefixed environment variables. Every field has a default so the
/// server also runs with no config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  #[serde(default = "default_store_path")]
  pub store_path:  PathBuf,
  #[serde(default = "default_leave_types")]
  pub leave_types: Vec<LeaveTypeConfig>,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_store_path() -> PathBuf {
  PathBuf::from("tally.db")
}

fn default_leave_types() -> Vec<LeaveTypeConfig> {
  [("casual", 12), ("sick", 10), ("earned", 15)]
    .into_iter()
    .map(|(name, default_days)| LeaveTypeConfig {
      name: name.to_string(),
      default_days,
    })
    .collect()
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Seed the leave-type catalog from configuration. Idempotent by type name,
/// so restarts never duplicate or mutate existing entries.
pub async fn seed_catalog(
  store: &SqliteStore,
  config: &ServerConfig,
) -> tally_core::Result<()> {
  let types = config
    .leave_types
    .iter()
    .map(|t| NewLeaveType {
      name:         t.name.clone(),
      default_days: t.default_days,
    })
    .collect();
  let catalog = store.seed_leave_types(types).await?;
  for t in &catalog {
    tracing::info!(name = %t.name, default_days = t.default_days, "leave type");
  }
  Ok(())
}

/// Build the top-level router: the JSON API under `/api`, with request
/// tracing.
pub fn router(store: Arc<SqliteStore>) -> Router {
  Router::new()
    .nest("/api", tally_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_config_falls_back_to_defaults() {
    let settings = config::Config::builder().build().unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();

    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.leave_types.len(), 3);
    assert!(cfg.leave_types.iter().any(|t| t.name == "earned"));
  }
}
