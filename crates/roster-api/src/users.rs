//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/users`      | Every contact, insertion order |
//! | `POST`   | `/users`      | Body: [`ContactFormData`]; returns 201 + stored contact |
//! | `GET`    | `/users/{id}`  | 404 if not found |
//! | `PUT`    | `/users/{id}`  | Body: [`ContactFormData`]; 404 if not found |
//! | `DELETE` | `/users/{id}`  | 204; 404 if not found |
//!
//! Bodies that parse but fail field validation are answered with 422.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use roster_core::{Contact, ContactFormData, store::ContactStore};

use crate::error::ApiError;

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> ApiError {
  ApiError::Store(Box::new(e))
}

fn not_found(id: &str) -> ApiError { ApiError::NotFound(format!("contact {id} not found")) }

fn checked(body: ContactFormData) -> Result<ContactFormData, ApiError> {
  let body = body.trimmed();
  body
    .validate(Utc::now().date_naive())
    .map_err(ApiError::Unprocessable)?;
  Ok(body)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let contacts = store.list().await.map_err(store_err)?;
  Ok(Json(contacts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users`. Returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ContactFormData>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
{
  let contact = store.create(checked(body)?).await.map_err(store_err)?;
  tracing::info!(id = %contact.id, "contact created");
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let contact = store
    .get(&id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /users/{id}`. Replaces every mutable field.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<ContactFormData>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let contact = store
    .update(&id, checked(body)?)
    .await
    .map_err(store_err)?
    .ok_or_else(|| not_found(&id))?;
  tracing::info!(%id, "contact updated");
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore,
{
  if !store.delete(&id).await.map_err(store_err)? {
    return Err(not_found(&id));
  }
  tracing::info!(%id, "contact deleted");
  Ok(StatusCode::NO_CONTENT)
}
