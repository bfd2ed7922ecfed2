//! Error types for `roster-core`.
//!
//! This is the taxonomy every layer above the stores speaks. Backend crates
//! convert their own errors into it.

use thiserror::Error;

use crate::form::FormErrors;

#[derive(Debug, Error)]
pub enum Error {
  /// The request never produced a response (connect, timeout, body read).
  #[error("network error: {0}")]
  Network(String),

  /// Any non-2xx status that is neither a 404 nor a validation rejection.
  #[error("server error ({status}): {message}")]
  Server { status: u16, message: String },

  #[error("contact not found: {0}")]
  NotFound(String),

  /// The service rejected a create/update payload.
  #[error("rejected by server: {0}")]
  Validation(String),

  /// Client-side validation failed; no request was made.
  #[error("invalid form: {0}")]
  Form(FormErrors),

  /// A success response whose body is not a contact record.
  #[error("malformed response: {0}")]
  Decode(String),
}

impl Error {
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

impl From<FormErrors> for Error {
  fn from(errors: FormErrors) -> Self { Self::Form(errors) }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self { Self::Decode(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
