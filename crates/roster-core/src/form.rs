//! Form data for create/update, and the checks run before any request.
//!
//! [`ContactDraft`] is what a form edits: free text plus optional selections.
//! Validating a draft yields a [`ContactFormData`], the request body sent to
//! the remote service.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::contact::{Contact, Gender, Role, iso_date};

// ─── Fields & errors ─────────────────────────────────────────────────────────

/// A user-editable field, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
  FirstName,
  LastName,
  Email,
  Role,
  Gender,
  BirthDate,
  IsActive,
  Newsletter,
}

impl Field {
  pub const ALL: [Field; 8] = [
    Field::FirstName,
    Field::LastName,
    Field::Email,
    Field::Role,
    Field::Gender,
    Field::BirthDate,
    Field::IsActive,
    Field::Newsletter,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Field::FirstName => "First Name",
      Field::LastName => "Last Name",
      Field::Email => "Email",
      Field::Role => "Role",
      Field::Gender => "Gender",
      Field::BirthDate => "Birth Date",
      Field::IsActive => "Is Active",
      Field::Newsletter => "Subscribe to Newsletter",
    }
  }

  /// The camelCase key used for this field on the wire.
  pub fn key(self) -> &'static str {
    match self {
      Field::FirstName => "firstName",
      Field::LastName => "lastName",
      Field::Email => "email",
      Field::Role => "role",
      Field::Gender => "gender",
      Field::BirthDate => "birthDate",
      Field::IsActive => "isActive",
      Field::Newsletter => "newsletter",
    }
  }

  pub fn is_required(self) -> bool {
    !matches!(self, Field::IsActive | Field::Newsletter)
  }
}

/// Field-level validation messages, reported all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, String>);

impl FormErrors {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, field: Field, message: impl Into<String>) {
    self.0.insert(field, message.into());
  }

  pub fn remove(&mut self, field: Field) -> Option<String> { self.0.remove(&field) }

  pub fn get(&self, field: Field) -> Option<&str> { self.0.get(&field).map(String::as_str) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
    self.0.iter().map(|(f, m)| (*f, m.as_str()))
  }

  /// The first offending field in form order.
  pub fn first_field(&self) -> Option<Field> { self.0.keys().next().copied() }
}

impl fmt::Display for FormErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, message) in self.iter() {
      if !first {
        f.write_str("; ")?;
      }
      write!(f, "{}: {message}", field.label())?;
      first = false;
    }
    Ok(())
  }
}

// ─── Validated form data ─────────────────────────────────────────────────────

/// The mutable subset of a [`Contact`]: the POST/PUT body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub role:       Role,
  pub gender:     Gender,
  pub is_active:  bool,
  pub newsletter: bool,
  #[serde(with = "iso_date")]
  pub birth_date: NaiveDate,
}

impl ContactFormData {
  /// Re-check already-typed data, e.g. a body received by the server.
  pub fn validate(&self, today: NaiveDate) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    check_text(&mut errors, &self.first_name, &self.last_name, &self.email);
    check_birth_date(&mut errors, Some(self.birth_date), today);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
  }

  /// Trim surrounding whitespace from the text fields.
  pub fn trimmed(mut self) -> Self {
    self.first_name = self.first_name.trim().to_owned();
    self.last_name = self.last_name.trim().to_owned();
    self.email = self.email.trim().to_owned();
    self
  }
}

impl From<&Contact> for ContactFormData {
  fn from(c: &Contact) -> Self {
    Self {
      first_name: c.first_name.clone(),
      last_name:  c.last_name.clone(),
      email:      c.email.clone(),
      role:       c.role,
      gender:     c.gender,
      is_active:  c.is_active,
      newsletter: c.newsletter,
      birth_date: c.birth_date,
    }
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Form contents while being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub role:       Option<Role>,
  pub gender:     Option<Gender>,
  pub is_active:  bool,
  pub newsletter: bool,
  pub birth_date: Option<NaiveDate>,
}

impl ContactDraft {
  /// Blank form for a new contact.
  pub fn default_for_create(today: NaiveDate) -> Self {
    Self {
      first_name: String::new(),
      last_name:  String::new(),
      email:      String::new(),
      role:       Some(Role::User),
      gender:     Some(Gender::Male),
      is_active:  true,
      newsletter: true,
      birth_date: Some(today),
    }
  }

  /// Validate every field, returning trimmed form data or all failures.
  pub fn validate(&self, today: NaiveDate) -> Result<ContactFormData, FormErrors> {
    let mut errors = FormErrors::new();
    check_text(&mut errors, &self.first_name, &self.last_name, &self.email);
    if self.role.is_none() {
      errors.insert(Field::Role, "Please select a role");
    }
    if self.gender.is_none() {
      errors.insert(Field::Gender, "Please select a gender");
    }
    check_birth_date(&mut errors, self.birth_date, today);

    match (self.role, self.gender, self.birth_date) {
      (Some(role), Some(gender), Some(birth_date)) if errors.is_empty() => {
        Ok(
          ContactFormData {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role,
            gender,
            is_active: self.is_active,
            newsletter: self.newsletter,
            birth_date,
          }
          .trimmed(),
        )
      }
      _ => Err(errors),
    }
  }
}

impl From<&Contact> for ContactDraft {
  fn from(c: &Contact) -> Self {
    Self {
      first_name: c.first_name.clone(),
      last_name:  c.last_name.clone(),
      email:      c.email.clone(),
      role:       Some(c.role),
      gender:     Some(c.gender),
      is_active:  c.is_active,
      newsletter: c.newsletter,
      birth_date: Some(c.birth_date),
    }
  }
}

// ─── Checks ──────────────────────────────────────────────────────────────────

fn check_text(errors: &mut FormErrors, first_name: &str, last_name: &str, email: &str) {
  if first_name.trim().is_empty() {
    errors.insert(Field::FirstName, "First name is required");
  }
  if last_name.trim().is_empty() {
    errors.insert(Field::LastName, "Last name is required");
  }
  if !email.trim().to_owned().validate_email() {
    errors.insert(Field::Email, "Please enter a valid email address");
  }
}

fn check_birth_date(errors: &mut FormErrors, date: Option<NaiveDate>, today: NaiveDate) {
  match date {
    None => errors.insert(Field::BirthDate, "Birth date is required"),
    Some(d) if d > today => {
      errors.insert(Field::BirthDate, "Birth date cannot be in the future")
    }
    Some(_) => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() }

  fn ada() -> ContactDraft {
    ContactDraft {
      first_name: "Ada".into(),
      last_name:  "Lovelace".into(),
      email:      "ada@example.com".into(),
      role:       Some(Role::Admin),
      gender:     Some(Gender::Female),
      is_active:  true,
      newsletter: false,
      birth_date: NaiveDate::from_ymd_opt(1815, 12, 10),
    }
  }

  #[test]
  fn valid_draft_produces_form_data() {
    let data = ada().validate(today()).unwrap();
    assert_eq!(data.first_name, "Ada");
    assert_eq!(data.role, Role::Admin);
    assert_eq!(data.birth_date, NaiveDate::from_ymd_opt(1815, 12, 10).unwrap());
  }

  #[test]
  fn text_fields_are_trimmed() {
    let mut draft = ada();
    draft.first_name = "  Ada ".into();
    draft.email = " ada@example.com".into();
    let data = draft.validate(today()).unwrap();
    assert_eq!(data.first_name, "Ada");
    assert_eq!(data.email, "ada@example.com");
  }

  #[test]
  fn empty_first_name_is_a_field_error() {
    let mut draft = ada();
    draft.first_name = "   ".into();
    let errors = draft.validate(today()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
    assert_eq!(errors.first_field(), Some(Field::FirstName));
  }

  #[test]
  fn every_failure_is_reported() {
    let draft = ContactDraft {
      first_name: String::new(),
      last_name:  String::new(),
      email:      "not-an-email".into(),
      role:       None,
      gender:     None,
      is_active:  false,
      newsletter: false,
      birth_date: None,
    };
    let errors = draft.validate(today()).unwrap_err();
    assert_eq!(errors.len(), 6);
    assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address"));
    assert_eq!(errors.get(Field::Role), Some("Please select a role"));
    assert_eq!(errors.get(Field::Gender), Some("Please select a gender"));
    assert_eq!(errors.get(Field::BirthDate), Some("Birth date is required"));
  }

  #[test]
  fn future_birth_date_is_rejected() {
    let mut draft = ada();
    draft.birth_date = today().succ_opt();
    let errors = draft.validate(today()).unwrap_err();
    assert_eq!(errors.get(Field::BirthDate), Some("Birth date cannot be in the future"));

    draft.birth_date = Some(today());
    assert!(draft.validate(today()).is_ok());
  }

  #[test]
  fn create_defaults_match_blank_form() {
    let draft = ContactDraft::default_for_create(today());
    assert_eq!(draft.role, Some(Role::User));
    assert_eq!(draft.gender, Some(Gender::Male));
    assert!(draft.is_active && draft.newsletter);
    assert_eq!(draft.birth_date, Some(today()));

    let errors = draft.validate(today()).unwrap_err();
    let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
    assert_eq!(fields, vec![Field::FirstName, Field::LastName, Field::Email]);
  }

  #[test]
  fn form_data_wire_shape() {
    let data = ada().validate(today()).unwrap();
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value["firstName"], "Ada");
    assert_eq!(value["isActive"], true);
    assert_eq!(value["birthDate"], "1815-12-10");
    assert!(value.get("id").is_none());
  }
}
