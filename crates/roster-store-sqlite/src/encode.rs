//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, birth dates as `YYYY-MM-DD`,
//! and the closed enumerations by variant name.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use roster_core::{Contact, Gender, Role};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role / Gender ───────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> String { r.to_string() }

pub fn decode_role(s: &str) -> Result<Role> {
  Role::from_str(s).map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

pub fn encode_gender(g: Gender) -> String { g.to_string() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  Gender::from_str(s).map_err(|_| Error::Decode(format!("unknown gender: {s:?}")))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that builds a [`RawContact`].
pub const CONTACT_COLUMNS: &str = "id, first_name, last_name, email, role, gender, \
   is_active, newsletter, birth_date, created_at, updated_at";

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub role:       String,
  pub gender:     String,
  pub is_active:  bool,
  pub newsletter: bool,
  pub birth_date: String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawContact {
  /// Map a row selected with [`CONTACT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      email:      row.get(3)?,
      role:       row.get(4)?,
      gender:     row.get(5)?,
      is_active:  row.get(6)?,
      newsletter: row.get(7)?,
      birth_date: row.get(8)?,
      created_at: row.get(9)?,
      updated_at: row.get(10)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:         self.id,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      role:       decode_role(&self.role)?,
      gender:     decode_gender(&self.gender)?,
      is_active:  self.is_active,
      newsletter: self.newsletter,
      birth_date: decode_date(&self.birth_date)?,
      created_at: Some(decode_dt(&self.created_at)?),
      updated_at: Some(decode_dt(&self.updated_at)?),
    })
  }
}
