//! Create/edit form state: the draft being typed, field focus, and inline
//! errors.

use chrono::NaiveDate;
use roster_core::{Contact, ContactDraft, Field, FormErrors, contact::iso_date};
use strum::IntoEnumIterator;

/// Format the birth date is typed in.
pub const INPUT_DATE_FORMAT: &str = "%m/%d/%Y";

const BAD_DATE_MESSAGE: &str = "Enter the birth date as MM/DD/YYYY";

#[derive(Debug, Clone)]
pub struct FormState {
  pub draft:      ContactDraft,
  pub focus:      Field,
  /// Birth date as typed; parsed into the draft on every edit.
  pub birth_date: String,
  pub errors:     FormErrors,
  pub is_edit:    bool,
}

impl FormState {
  pub fn for_create(today: NaiveDate) -> Self {
    Self::from_draft(ContactDraft::default_for_create(today), false)
  }

  pub fn for_edit(contact: &Contact) -> Self { Self::from_draft(ContactDraft::from(contact), true) }

  fn from_draft(draft: ContactDraft, is_edit: bool) -> Self {
    let birth_date = draft
      .birth_date
      .map(|d| d.format(INPUT_DATE_FORMAT).to_string())
      .unwrap_or_default();
    Self {
      draft,
      focus: Field::FirstName,
      birth_date,
      errors: FormErrors::new(),
      is_edit,
    }
  }

  // ── Focus ─────────────────────────────────────────────────────────────────

  fn focus_index(&self) -> usize {
    Field::ALL
      .iter()
      .position(|f| *f == self.focus)
      .unwrap_or_default()
  }

  pub fn focus_next(&mut self) {
    self.focus = Field::ALL[(self.focus_index() + 1) % Field::ALL.len()];
  }

  pub fn focus_prev(&mut self) {
    let len = Field::ALL.len();
    self.focus = Field::ALL[(self.focus_index() + len - 1) % len];
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  fn text_mut(&mut self) -> Option<&mut String> {
    match self.focus {
      Field::FirstName => Some(&mut self.draft.first_name),
      Field::LastName => Some(&mut self.draft.last_name),
      Field::Email => Some(&mut self.draft.email),
      Field::BirthDate => Some(&mut self.birth_date),
      _ => None,
    }
  }

  fn edited(&mut self) {
    let field = self.focus;
    self.errors.remove(field);
    if field == Field::BirthDate {
      self.draft.birth_date = parse_input_date(&self.birth_date);
    }
  }

  /// Type `c` into the focused field. Space toggles a focused checkbox.
  pub fn input_char(&mut self, c: char) {
    if c == ' ' && matches!(self.focus, Field::IsActive | Field::Newsletter) {
      self.toggle();
      return;
    }
    if let Some(text) = self.text_mut() {
      text.push(c);
      self.edited();
    }
  }

  pub fn backspace(&mut self) {
    if let Some(text) = self.text_mut() {
      text.pop();
      self.edited();
    }
  }

  /// Step the focused selection (Role or Gender) forwards or backwards.
  pub fn cycle(&mut self, forward: bool) {
    match self.focus {
      Field::Role => self.draft.role = Some(step(self.draft.role, forward)),
      Field::Gender => self.draft.gender = Some(step(self.draft.gender, forward)),
      _ => return,
    }
    self.edited();
  }

  pub fn toggle(&mut self) {
    match self.focus {
      Field::IsActive => self.draft.is_active = !self.draft.is_active,
      Field::Newsletter => self.draft.newsletter = !self.draft.newsletter,
      _ => {}
    }
  }

  // ── Errors ────────────────────────────────────────────────────────────────

  /// Show `errors` inline and move focus to the first offending field.
  pub fn show_errors(&mut self, mut errors: FormErrors) {
    if !self.birth_date.trim().is_empty() && self.draft.birth_date.is_none() {
      errors.insert(Field::BirthDate, BAD_DATE_MESSAGE);
    }
    if let Some(first) = errors.first_field() {
      self.focus = first;
    }
    self.errors = errors;
  }

  pub fn error(&self, field: Field) -> Option<&str> { self.errors.get(field) }

  /// Display text for a field's current value.
  pub fn value_text(&self, field: Field) -> String {
    let d = &self.draft;
    match field {
      Field::FirstName => d.first_name.clone(),
      Field::LastName => d.last_name.clone(),
      Field::Email => d.email.clone(),
      Field::Role => d.role.map(|r| r.to_string()).unwrap_or_default(),
      Field::Gender => d.gender.map(|g| g.to_string()).unwrap_or_default(),
      Field::BirthDate => self.birth_date.clone(),
      Field::IsActive => checkbox(d.is_active).to_string(),
      Field::Newsletter => checkbox(d.newsletter).to_string(),
    }
  }
}

fn checkbox(on: bool) -> &'static str { if on { "[x]" } else { "[ ]" } }

/// `MM/DD/YYYY`, or an ISO date for convenience.
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT)
    .ok()
    .or_else(|| iso_date::parse(raw))
}

/// The variant after (or before) `current`, wrapping. `None` starts at the
/// first variant.
fn step<T>(current: Option<T>, forward: bool) -> T
where
  T: IntoEnumIterator + PartialEq + Copy,
{
  let all: Vec<T> = T::iter().collect();
  let len = all.len();
  let idx = match current.and_then(|c| all.iter().position(|v| *v == c)) {
    Some(i) if forward => (i + 1) % len,
    Some(i) => (i + len - 1) % len,
    None => 0,
  };
  all[idx]
}
