//! [`SqliteStore`]: the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{Contact, ContactFormData, store::ContactStore};

use crate::{
  Result,
  encode::{CONTACT_COLUMNS, RawContact, encode_date, encode_dt, encode_gender, encode_role},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch(&self, id: String) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
              rusqlite::params![id],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn list(&self) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn get(&self, id: &str) -> Result<Option<Contact>> {
    self.fetch(id.to_owned()).await
  }

  async fn create(&self, data: ContactFormData) -> Result<Contact> {
    let now = Utc::now();
    let contact = Contact {
      id:         Uuid::new_v4().hyphenated().to_string(),
      first_name: data.first_name,
      last_name:  data.last_name,
      email:      data.email,
      role:       data.role,
      gender:     data.gender,
      is_active:  data.is_active,
      newsletter: data.newsletter,
      birth_date: data.birth_date,
      created_at: Some(now),
      updated_at: Some(now),
    };

    let id         = contact.id.clone();
    let first_name = contact.first_name.clone();
    let last_name  = contact.last_name.clone();
    let email      = contact.email.clone();
    let role       = encode_role(contact.role);
    let gender     = encode_gender(contact.gender);
    let is_active  = contact.is_active;
    let newsletter = contact.newsletter;
    let birth_date = encode_date(contact.birth_date);
    let at_str     = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             id, first_name, last_name, email, role, gender,
             is_active, newsletter, birth_date, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            id, first_name, last_name, email, role, gender,
            is_active, newsletter, birth_date, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(contact)
  }

  async fn update(&self, id: &str, data: ContactFormData) -> Result<Option<Contact>> {
    let id_str     = id.to_owned();
    let role       = encode_role(data.role);
    let gender     = encode_gender(data.gender);
    let birth_date = encode_date(data.birth_date);
    let at_str     = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE contacts SET
             first_name = ?2, last_name = ?3, email = ?4, role = ?5, gender = ?6,
             is_active = ?7, newsletter = ?8, birth_date = ?9, updated_at = ?10
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            data.first_name,
            data.last_name,
            data.email,
            role,
            gender,
            data.is_active,
            data.newsletter,
            birth_date,
            at_str,
          ],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch(id.to_owned()).await
  }

  async fn delete(&self, id: &str) -> Result<bool> {
    let id_str = id.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id_str])?;
        Ok(n)
      })
      .await?;
    Ok(removed > 0)
  }
}
