//! Error types for `folio-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No candidate date template matched the raw legacy value.
  #[error("could not transform date {0:?} to ISO format")]
  DateFormat(String),

  /// A required upstream entity is missing, e.g. an issue referenced by a
  /// document that was never registered.
  #[error("{kind} not found: {id}")]
  RecordNotFound { kind: &'static str, id: String },

  /// Repository or transport failure. A write that fails must surface here;
  /// it is never silently dropped.
  #[error("store error: {0}")]
  Store(String),

  /// A rendition entry is missing a required field (language, url, filename
  /// or kind).
  #[error("validation error: {0}")]
  Validation(String),

  /// Missing required paths or credentials. Fatal; raised at startup before
  /// any identifier is processed.
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
    Self::RecordNotFound {
      kind,
      id: id.into(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
