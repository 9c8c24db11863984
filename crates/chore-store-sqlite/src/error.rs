//! Error type for `chore-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A suspension point (connection open, statement completion) exceeded
  /// its bound.
  #[error("timed out {0}")]
  Timeout(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
