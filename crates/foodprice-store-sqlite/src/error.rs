//! Error type for `foodprice-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] foodprice_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A stored row did not have the shape its dimension expects.
  #[error("malformed {table} row {id}: {reason}")]
  MalformedRow {
    table:  &'static str,
    id:     i64,
    reason: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
