//! Async HTTP client wrapping the Roster JSON API.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_core::{Contact, ContactFormData, Error, Result, WireContact, store::ContactStore};
use serde::Deserialize;

/// Connection settings for the contacts service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:3000".to_string(),
      username: String::new(),
      password: String::new(),
    }
  }
}

/// [`ContactStore`] over the `/users` REST resource.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpStore {
  client: Client,
  config: ApiConfig,
}

/// `{"error": "..."}`, the error body shape of the dev server.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl HttpStore {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    tracing::debug!("{what}");
    let resp = self
      .auth(req)
      .send()
      .await
      .map_err(|e| Error::Network(format!("{what} failed: {e}")))?;
    tracing::debug!(status = %resp.status(), "{what} answered");
    Ok(resp)
  }
}

// ─── Response helpers ─────────────────────────────────────────────────────────

/// Best-effort message for a failed response.
async fn error_message(resp: Response) -> String {
  let status = resp.status();
  match resp.json::<ErrorBody>().await {
    Ok(body) => body.error,
    Err(_) => status
      .canonical_reason()
      .unwrap_or("request failed")
      .to_string(),
  }
}

async fn server_error(resp: Response) -> Error {
  let status = resp.status().as_u16();
  Error::Server {
    status,
    message: error_message(resp).await,
  }
}

/// Non-404 client errors on a write are the service rejecting the payload.
async fn write_error(resp: Response) -> Error {
  if resp.status().is_client_error() {
    Error::Validation(error_message(resp).await)
  } else {
    server_error(resp).await
  }
}

async fn decode_contact(resp: Response) -> Result<Contact> {
  let wire: WireContact = resp.json().await.map_err(body_error)?;
  Ok(wire.normalize(Utc::now()))
}

fn body_error(e: reqwest::Error) -> Error {
  if e.is_decode() {
    Error::Decode(e.to_string())
  } else {
    Error::Network(e.to_string())
  }
}

// ─── ContactStore impl ────────────────────────────────────────────────────────

impl ContactStore for HttpStore {
  type Error = Error;

  /// `GET /users`
  async fn list(&self) -> Result<Vec<Contact>> {
    let resp = self.send(self.client.get(self.url("/users")), "GET /users").await?;
    if !resp.status().is_success() {
      return Err(server_error(resp).await);
    }
    let wire: Vec<WireContact> = resp.json().await.map_err(body_error)?;
    let now = Utc::now();
    Ok(wire.into_iter().map(|w| w.normalize(now)).collect())
  }

  /// `GET /users/{id}`
  async fn get(&self, id: &str) -> Result<Option<Contact>> {
    let path = format!("/users/{id}");
    let resp = self
      .send(self.client.get(self.url(&path)), &format!("GET {path}"))
      .await?;
    match resp.status() {
      StatusCode::NOT_FOUND => Ok(None),
      s if s.is_success() => decode_contact(resp).await.map(Some),
      _ => Err(server_error(resp).await),
    }
  }

  /// `POST /users`
  async fn create(&self, data: ContactFormData) -> Result<Contact> {
    let resp = self
      .send(self.client.post(self.url("/users")).json(&data), "POST /users")
      .await?;
    if !resp.status().is_success() {
      return Err(write_error(resp).await);
    }
    decode_contact(resp).await
  }

  /// `PUT /users/{id}`
  async fn update(&self, id: &str, data: ContactFormData) -> Result<Option<Contact>> {
    let path = format!("/users/{id}");
    let resp = self
      .send(self.client.put(self.url(&path)).json(&data), &format!("PUT {path}"))
      .await?;
    match resp.status() {
      StatusCode::NOT_FOUND => Ok(None),
      s if s.is_success() => decode_contact(resp).await.map(Some),
      _ => Err(write_error(resp).await),
    }
  }

  /// `DELETE /users/{id}`
  async fn delete(&self, id: &str) -> Result<bool> {
    let path = format!("/users/{id}");
    let resp = self
      .send(self.client.delete(self.url(&path)), &format!("DELETE {path}"))
      .await?;
    match resp.status() {
      StatusCode::NOT_FOUND => Ok(false),
      s if s.is_success() => Ok(true),
      _ => Err(server_error(resp).await),
    }
  }
}
