//! Connection parameters for [`SqliteStore`](crate::SqliteStore).

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// How to reach the warehouse database. Loaded once at startup and passed to
/// [`SqliteStore::open`](crate::SqliteStore::open).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Path of the SQLite file; created on first open.
  #[serde(default = "default_path")]
  pub path:            PathBuf,
  /// How long a statement waits on a locked database before failing.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_path() -> PathBuf { PathBuf::from("foodprice.sqlite") }

fn default_busy_timeout_ms() -> u64 { 5_000 }

impl StoreConfig {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), busy_timeout_ms: default_busy_timeout_ms() }
  }

  pub fn busy_timeout(&self) -> Duration {
    Duration::from_millis(self.busy_timeout_ms)
  }
}
