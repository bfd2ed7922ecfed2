//! The person record managed by Roster.
//!
//! [`WireContact`] is the record as the remote service sends it. The gateway
//! normalises it into a [`Contact`] before anything else sees it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::Result;

/// Date format used wherever a birth date is shown or typed by a person.
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
  Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum Role {
  Admin,
  User,
  Viewer,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash,
  Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum Gender {
  Male,
  Female,
  Other,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A normalised contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  /// Assigned by the remote service; never changes.
  pub id:          String,
  pub first_name:  String,
  pub last_name:   String,
  pub email:       String,
  pub role:        Role,
  pub gender:      Gender,
  pub is_active:   bool,
  pub newsletter:  bool,
  #[serde(with = "iso_date")]
  pub birth_date:  NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:  Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:  Option<DateTime<Utc>>,
}

impl Contact {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }

  /// "Active" / "Inactive", as shown in the status column.
  pub fn status_text(&self) -> &'static str {
    if self.is_active { "Active" } else { "Inactive" }
  }

  pub fn birth_date_text(&self) -> String {
    self.birth_date.format(DISPLAY_DATE_FORMAT).to_string()
  }
}

// ─── Wire record ─────────────────────────────────────────────────────────────

/// Identifiers arrive as numbers from some services and strings from others.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
  Number(i64),
  Text(String),
}

impl std::fmt::Display for WireId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      WireId::Number(n) => write!(f, "{n}"),
      WireId::Text(s) => f.write_str(s),
    }
  }
}

/// A contact record exactly as received over the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContact {
  pub id:         WireId,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub role:       Role,
  pub gender:     Gender,
  pub is_active:  bool,
  #[serde(default)]
  pub newsletter: bool,
  #[serde(with = "iso_date")]
  pub birth_date: NaiveDate,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
}

impl WireContact {
  /// Parse a single record from a JSON value.
  pub fn from_json(value: serde_json::Value) -> Result<Self> {
    Ok(serde_json::from_value(value)?)
  }

  /// Coerce the id to a string and stamp missing timestamps with `now`.
  pub fn normalize(self, now: DateTime<Utc>) -> Contact {
    Contact {
      id:         self.id.to_string(),
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      role:       self.role,
      gender:     self.gender,
      is_active:  self.is_active,
      newsletter: self.newsletter,
      birth_date: self.birth_date,
      created_at: Some(self.created_at.unwrap_or(now)),
      updated_at: Some(self.updated_at.unwrap_or(now)),
    }
  }
}

// ─── Date codec ──────────────────────────────────────────────────────────────

/// `birthDate` is written as `YYYY-MM-DD`. Reading also accepts an RFC 3339
/// timestamp, keeping its UTC date.
pub mod iso_date {
  use chrono::{DateTime, NaiveDate};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format("%Y-%m-%d"))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw:?}")))
  }

  pub fn parse(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
      DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_utc().date())
    })
  }
}
