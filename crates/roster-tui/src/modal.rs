//! Modal orchestrator: at most one modal open, each with its own session.
//!
//! Every transition starts a new [`Session`]. Work launched from a modal
//! remembers the session it was launched in, so a completion that lands after
//! the modal was closed or replaced can tell it no longer owns the UI.

use roster_core::Contact;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
  Create,
  Edit(Contact),
  View(Contact),
  Delete(Contact),
}

impl Modal {
  /// The record the modal acts on. `Create` has none.
  pub fn target(&self) -> Option<&Contact> {
    match self {
      Modal::Create => None,
      Modal::Edit(c) | Modal::View(c) | Modal::Delete(c) => Some(c),
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      Modal::Create => "Create New Contact",
      Modal::Edit(_) => "Edit Contact",
      Modal::View(_) => "Contact Details",
      Modal::Delete(_) => "Delete Contact",
    }
  }
}

/// Identifies one opening of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session(u64);

#[derive(Debug, Default)]
pub struct ModalState {
  active:  Option<Modal>,
  counter: u64,
}

impl ModalState {
  fn transition(&mut self, next: Option<Modal>) {
    self.counter += 1;
    self.active = next;
  }

  pub fn open_create(&mut self) { self.transition(Some(Modal::Create)) }

  pub fn open_edit(&mut self, contact: Contact) { self.transition(Some(Modal::Edit(contact))) }

  pub fn open_view(&mut self, contact: Contact) { self.transition(Some(Modal::View(contact))) }

  pub fn open_delete(&mut self, contact: Contact) { self.transition(Some(Modal::Delete(contact))) }

  pub fn close(&mut self) { self.transition(None) }

  pub fn active(&self) -> Option<&Modal> { self.active.as_ref() }

  pub fn is_open(&self) -> bool { self.active.is_some() }

  pub fn target(&self) -> Option<&Contact> { self.active.as_ref().and_then(Modal::target) }

  /// The current session, if a modal is open.
  pub fn session(&self) -> Option<Session> { self.active.as_ref().map(|_| Session(self.counter)) }

  pub fn is_current(&self, session: Session) -> bool { self.session() == Some(session) }

  /// Close only if `session` still owns the modal. Returns whether it closed.
  pub fn close_if(&mut self, session: Session) -> bool {
    if self.is_current(session) {
      self.close();
      true
    } else {
      false
    }
  }

  /// Swap in a fresher copy of the target without starting a new session.
  pub fn retarget(&mut self, contact: Contact) {
    if let Some(Modal::Edit(c) | Modal::View(c) | Modal::Delete(c)) = &mut self.active
      && c.id == contact.id
    {
      *c = contact;
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use roster_core::{Gender, Role};

  use super::*;

  fn ada() -> Contact {
    Contact {
      id:         "1".into(),
      first_name: "Ada".into(),
      last_name:  "Lovelace".into(),
      email:      "ada@example.com".into(),
      role:       Role::Admin,
      gender:     Gender::Female,
      is_active:  true,
      newsletter: false,
      birth_date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
      created_at: None,
      updated_at: None,
    }
  }

  #[test]
  fn starts_closed() {
    let m = ModalState::default();
    assert!(!m.is_open());
    assert!(m.session().is_none());
    assert!(m.target().is_none());
  }

  #[test]
  fn at_most_one_modal_is_open() {
    let mut m = ModalState::default();
    m.open_view(ada());
    m.open_delete(ada());
    assert!(matches!(m.active(), Some(Modal::Delete(_))));
    m.open_create();
    assert_eq!(m.active(), Some(&Modal::Create));
    assert!(m.target().is_none());
  }

  #[test]
  fn targeted_modals_carry_their_contact() {
    let mut m = ModalState::default();
    for open in [ModalState::open_edit, ModalState::open_view, ModalState::open_delete] {
      open(&mut m, ada());
      assert_eq!(m.target().map(|c| c.id.as_str()), Some("1"));
    }
  }

  #[test]
  fn close_works_from_every_state() {
    let mut m = ModalState::default();
    m.close();
    assert!(!m.is_open());
    for open in [ModalState::open_edit, ModalState::open_view, ModalState::open_delete] {
      open(&mut m, ada());
      m.close();
      assert!(!m.is_open());
    }
    m.open_create();
    m.close();
    assert!(!m.is_open());
  }

  #[test]
  fn stale_session_cannot_close_a_newer_modal() {
    let mut m = ModalState::default();
    m.open_edit(ada());
    let stale = m.session().unwrap();

    m.close();
    m.open_create();
    assert!(!m.is_current(stale));
    assert!(!m.close_if(stale));
    assert!(m.is_open());

    let current = m.session().unwrap();
    assert!(m.close_if(current));
    assert!(!m.is_open());
  }

  #[test]
  fn reopening_the_same_modal_is_a_new_session() {
    let mut m = ModalState::default();
    m.open_view(ada());
    let first = m.session().unwrap();
    m.open_view(ada());
    assert_ne!(m.session().unwrap(), first);
  }

  #[test]
  fn retarget_keeps_the_session() {
    let mut m = ModalState::default();
    m.open_view(ada());
    let session = m.session().unwrap();

    let mut fresher = ada();
    fresher.role = Role::Viewer;
    m.retarget(fresher);
    assert_eq!(m.target().unwrap().role, Role::Viewer);
    assert!(m.is_current(session));

    let mut other = ada();
    other.id = "2".into();
    m.retarget(other);
    assert_eq!(m.target().unwrap().id, "1");
  }
}
