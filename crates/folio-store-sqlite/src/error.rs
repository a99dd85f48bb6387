//! Error type for `folio-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value in row {id}: {value:?}")]
  UnknownColumnValue {
    column: &'static str,
    id:     String,
    value:  String,
  },
}

impl From<Error> for folio_core::Error {
  fn from(err: Error) -> Self {
    folio_core::Error::Store(err.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
