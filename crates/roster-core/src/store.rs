//! The `ContactStore` trait.
//!
//! Implemented by the SQLite backend behind the dev server and by the HTTP
//! client that talks to it. The gateway cache and the REST router depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{contact::Contact, form::ContactFormData};

/// Abstraction over a collection of contacts.
///
/// Lookups by id report absence as `None` / `false` rather than an error so
/// each caller can decide what "missing" means at its own layer.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every contact in the collection.
  fn list(&self) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Retrieve one contact. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Persist a new contact; the store assigns the id.
  fn create(
    &self,
    data: ContactFormData,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Replace the mutable fields of `id`. Returns `None` if not found.
  fn update<'a>(
    &'a self,
    id: &'a str,
    data: ContactFormData,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Remove `id`. Returns `false` if it did not exist.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
