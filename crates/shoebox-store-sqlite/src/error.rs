//! Error type for `shoebox-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unsupported schema version {found} (expected {expected})")]
  SchemaVersion { found: i64, expected: i64 },

  /// The snapshot parsed but breaks a catalog invariant.
  #[error("corrupt snapshot: {0}")]
  Corrupt(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
