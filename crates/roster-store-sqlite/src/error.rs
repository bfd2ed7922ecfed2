//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column holds a value outside its closed set.
  #[error("corrupt row: {0}")]
  Decode(String),
}

/// From a caller's point of view the store failing is a server-side failure.
impl From<Error> for roster_core::Error {
  fn from(e: Error) -> Self {
    roster_core::Error::Server {
      status:  500,
      message: e.to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
