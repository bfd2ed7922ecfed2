//! CRUD coordinator: launches gateway requests off the UI task and applies
//! their outcomes back onto the modal and the notification queue.
//!
//! Requests run as spawned tokio tasks. Each reports a [`Completion`] over an
//! unbounded channel, which the event loop drains between frames, so all UI
//! state is only ever touched from one place.

use std::sync::Arc;

use chrono::NaiveDate;
use roster_client::Gateway;
use roster_core::{ContactDraft, Error, FormErrors, store::ContactStore};
use tokio::sync::mpsc;

use crate::{
  modal::{Modal, ModalState, Session},
  notice::Notices,
};

/// Shown in place of the table when the initial list fails, and as a notice
/// when a later refresh does.
pub const LOAD_ERROR_TEXT: &str = "There was an error loading the contacts. Press r to retry.";

// ─── Operations ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  Load,
  Create,
  Update,
  Delete,
}

impl Operation {
  fn index(self) -> usize {
    match self {
      Operation::Load => 0,
      Operation::Create => 1,
      Operation::Update => 2,
      Operation::Delete => 3,
    }
  }

  /// Loads succeed quietly.
  pub fn success_message(self) -> Option<&'static str> {
    match self {
      Operation::Load => None,
      Operation::Create => Some("Contact created successfully!"),
      Operation::Update => Some("Contact updated successfully!"),
      Operation::Delete => Some("Contact deleted successfully!"),
    }
  }

  pub fn failure_message(self) -> &'static str {
    match self {
      Operation::Load => LOAD_ERROR_TEXT,
      Operation::Create => "Failed to create contact. Please try again.",
      Operation::Update => "Failed to update contact. Please try again.",
      Operation::Delete => "Failed to delete contact. Please try again.",
    }
  }
}

/// The outcome of one spawned request.
#[derive(Debug)]
pub struct Completion {
  pub op:      Operation,
  pub session: Option<Session>,
  pub result:  Result<(), Error>,
}

/// Why a submit was refused before any request was made.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
  #[error("invalid form: {0}")]
  Invalid(FormErrors),

  #[error("no contact is selected for this action")]
  NoTarget,
}

// ─── Coordinator ──────────────────────────────────────────────────────────────

pub struct Coordinator<S> {
  gateway:    Arc<Gateway<S>>,
  in_flight:  [usize; 4],
  tx:         mpsc::UnboundedSender<Completion>,
  rx:         mpsc::UnboundedReceiver<Completion>,
  load_error: Option<String>,
}

impl<S> Coordinator<S> {
  pub fn gateway(&self) -> &Arc<Gateway<S>> { &self.gateway }

  pub fn is_loading(&self, op: Operation) -> bool { self.in_flight[op.index()] > 0 }

  /// True while any create, update or delete is outstanding.
  pub fn is_busy(&self) -> bool {
    [Operation::Create, Operation::Update, Operation::Delete]
      .into_iter()
      .any(|op| self.is_loading(op))
  }

  /// Set when the last list request failed; cleared by the next success.
  pub fn load_error(&self) -> Option<&str> { self.load_error.as_deref() }
}

impl<S> Coordinator<S>
where
  S: ContactStore + 'static,
  S::Error: Into<Error>,
{
  pub fn new(gateway: Arc<Gateway<S>>) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      gateway,
      in_flight: [0; 4],
      tx,
      rx,
      load_error: None,
    }
  }

  // ── Launching ─────────────────────────────────────────────────────────────

  fn spawn<F>(&mut self, op: Operation, session: Option<Session>, work: F)
  where
    F: Future<Output = Result<(), Error>> + Send + 'static,
  {
    self.in_flight[op.index()] += 1;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = work.await;
      // The receiver lives as long as the coordinator; a send can only fail
      // during shutdown.
      let _ = tx.send(Completion { op, session, result });
    });
  }

  /// Fetch the collection again.
  pub fn refresh(&mut self) {
    let gateway = self.gateway.clone();
    self.spawn(Operation::Load, None, async move {
      gateway.list().await.map(|_| ())
    });
  }

  pub fn submit_create(
    &mut self,
    modal: &ModalState,
    draft: &ContactDraft,
    today: NaiveDate,
  ) -> Result<(), SubmitError> {
    let data = draft.validate(today).map_err(SubmitError::Invalid)?;
    let gateway = self.gateway.clone();
    self.spawn(Operation::Create, modal.session(), async move {
      gateway.create(data).await.map(|_| ())
    });
    Ok(())
  }

  /// Requires the open modal to be an edit.
  pub fn submit_update(
    &mut self,
    modal: &ModalState,
    draft: &ContactDraft,
    today: NaiveDate,
  ) -> Result<(), SubmitError> {
    let Some(Modal::Edit(target)) = modal.active() else {
      return Err(SubmitError::NoTarget);
    };
    let data = draft.validate(today).map_err(SubmitError::Invalid)?;
    let id = target.id.clone();
    let gateway = self.gateway.clone();
    self.spawn(Operation::Update, modal.session(), async move {
      gateway.update(&id, data).await.map(|_| ())
    });
    Ok(())
  }

  /// Requires the open modal to be a delete confirmation.
  pub fn submit_delete(&mut self, modal: &ModalState) -> Result<(), SubmitError> {
    let Some(Modal::Delete(target)) = modal.active() else {
      return Err(SubmitError::NoTarget);
    };
    let id = target.id.clone();
    let gateway = self.gateway.clone();
    self.spawn(Operation::Delete, modal.session(), async move {
      gateway.delete(&id).await
    });
    Ok(())
  }

  // ── Completions ───────────────────────────────────────────────────────────

  /// Apply every completion that has arrived so far. Returns how many.
  pub fn apply_completions(&mut self, modal: &mut ModalState, notices: &mut Notices) -> usize {
    let mut applied = 0;
    while let Ok(completion) = self.rx.try_recv() {
      self.apply(completion, modal, notices);
      applied += 1;
    }
    applied
  }

  /// Wait for the next completion without applying it.
  pub async fn next_completion(&mut self) -> Option<Completion> { self.rx.recv().await }

  pub fn apply(&mut self, completion: Completion, modal: &mut ModalState, notices: &mut Notices) {
    let Completion { op, session, result } = completion;
    let slot = &mut self.in_flight[op.index()];
    *slot = slot.saturating_sub(1);

    match (op, result) {
      (Operation::Load, Ok(())) => self.load_error = None,
      (Operation::Load, Err(e)) => {
        tracing::error!(error = %e, "failed to load contacts");
        self.load_error = Some(LOAD_ERROR_TEXT.to_owned());
        // Before the first list the table itself shows the error; afterwards
        // the stale rows stay up and the failure goes to the status bar.
        if self.gateway.snapshot().is_some() {
          notices.push_error(Operation::Load.failure_message());
        }
      }
      (op, Ok(())) => {
        if let Some(message) = op.success_message() {
          notices.push_success(message);
        }
        if let Some(session) = session {
          modal.close_if(session);
        }
      }
      (op, Err(e)) => {
        tracing::warn!(?op, error = %e, "request failed");
        notices.push_error(op.failure_message());
        // A missing delete target is as good as deleted.
        if op == Operation::Delete
          && e.is_not_found()
          && let Some(session) = session
        {
          modal.close_if(session);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use roster_core::{Contact, ContactFormData, Field, Role};
  use roster_store_sqlite::SqliteStore;

  use super::*;
  use crate::notice::Level;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() }

  fn ada_draft() -> ContactDraft {
    let mut d = ContactDraft::default_for_create(today());
    d.first_name = "Ada".into();
    d.last_name = "Lovelace".into();
    d.email = "ada@example.com".into();
    d.birth_date = NaiveDate::from_ymd_opt(1815, 12, 10);
    d
  }

  async fn sqlite_coordinator() -> Coordinator<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    Coordinator::new(Arc::new(Gateway::new(store)))
  }

  async fn settle<S>(crud: &mut Coordinator<S>, modal: &mut ModalState, notices: &mut Notices)
  where
    S: ContactStore + 'static,
    S::Error: Into<Error>,
  {
    let completion = crud.next_completion().await.unwrap();
    crud.apply(completion, modal, notices);
  }

  /// A store whose every call fails at the transport, counting the attempts.
  #[derive(Default)]
  struct Unreachable {
    calls: AtomicUsize,
  }

  impl Unreachable {
    fn fail(&self) -> Error {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Error::Network("connection refused".into())
    }
  }

  impl ContactStore for Unreachable {
    type Error = Error;

    async fn list(&self) -> Result<Vec<Contact>, Error> { Err(self.fail()) }

    async fn get(&self, _id: &str) -> Result<Option<Contact>, Error> { Err(self.fail()) }

    async fn create(&self, _data: ContactFormData) -> Result<Contact, Error> { Err(self.fail()) }

    async fn update(&self, _id: &str, _data: ContactFormData) -> Result<Option<Contact>, Error> {
      Err(self.fail())
    }

    async fn delete(&self, _id: &str) -> Result<bool, Error> { Err(self.fail()) }
  }

  #[tokio::test]
  async fn create_success_notifies_and_closes() {
    let mut crud = sqlite_coordinator().await;
    let mut modal = ModalState::default();
    let mut notices = Notices::default();
    crud.refresh();
    settle(&mut crud, &mut modal, &mut notices).await;

    modal.open_create();
    crud.submit_create(&modal, &ada_draft(), today()).unwrap();
    assert!(crud.is_loading(Operation::Create));
    settle(&mut crud, &mut modal, &mut notices).await;

    assert!(!crud.is_loading(Operation::Create));
    assert!(!modal.is_open());
    let latest = notices.latest().unwrap();
    assert_eq!(latest.level, Level::Success);
    assert_eq!(latest.message, "Contact created successfully!");
    assert_eq!(crud.gateway().snapshot().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn empty_first_name_never_reaches_the_store() {
    let store = Unreachable::default();
    let mut crud = Coordinator::new(Arc::new(Gateway::new(store)));
    let mut modal = ModalState::default();
    modal.open_create();

    let mut draft = ada_draft();
    draft.first_name = "  ".into();
    let err = crud.submit_create(&modal, &draft, today()).unwrap_err();
    match err {
      SubmitError::Invalid(errors) => {
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
      }
      other => panic!("expected form errors, got {other:?}"),
    }
    assert!(!crud.is_loading(Operation::Create));
    assert_eq!(crud.gateway().store().calls.load(Ordering::SeqCst), 0);
    assert!(modal.is_open());
  }

  #[tokio::test]
  async fn failure_notifies_and_keeps_modal_open() {
    let mut crud = Coordinator::new(Arc::new(Gateway::new(Unreachable::default())));
    let mut modal = ModalState::default();
    let mut notices = Notices::default();

    modal.open_create();
    crud.submit_create(&modal, &ada_draft(), today()).unwrap();
    settle(&mut crud, &mut modal, &mut notices).await;

    assert!(modal.is_open());
    let latest = notices.latest().unwrap();
    assert_eq!(latest.level, Level::Error);
    assert_eq!(latest.message, "Failed to create contact. Please try again.");
  }

  #[tokio::test]
  async fn load_failure_sets_error_until_a_retry_succeeds() {
    let mut crud = Coordinator::new(Arc::new(Gateway::new(Unreachable::default())));
    let mut modal = ModalState::default();
    let mut notices = Notices::default();

    crud.refresh();
    assert!(crud.is_loading(Operation::Load));
    settle(&mut crud, &mut modal, &mut notices).await;
    assert!(!crud.is_loading(Operation::Load));
    assert_eq!(crud.load_error(), Some(LOAD_ERROR_TEXT));
    // Nothing was ever shown, so the table carries the error, not a notice.
    assert!(notices.is_empty());

    let mut ok = sqlite_coordinator().await;
    ok.load_error = Some(LOAD_ERROR_TEXT.into());
    ok.refresh();
    settle(&mut ok, &mut modal, &mut notices).await;
    assert_eq!(ok.load_error(), None);
  }

  #[tokio::test]
  async fn update_requires_an_edit_target() {
    let mut crud = sqlite_coordinator().await;
    let mut modal = ModalState::default();
    modal.open_create();
    let err = crud.submit_update(&modal, &ada_draft(), today()).unwrap_err();
    assert!(matches!(err, SubmitError::NoTarget));
    assert!(matches!(crud.submit_delete(&modal), Err(SubmitError::NoTarget)));
  }

  #[tokio::test]
  async fn update_changes_the_cached_record() {
    let mut crud = sqlite_coordinator().await;
    let mut modal = ModalState::default();
    let mut notices = Notices::default();
    let created = crud
      .gateway()
      .create(ada_draft().validate(today()).unwrap())
      .await
      .unwrap();
    crud.refresh();
    settle(&mut crud, &mut modal, &mut notices).await;

    modal.open_edit(created.clone());
    let mut draft = ContactDraft::from(&created);
    draft.role = Some(Role::Viewer);
    crud.submit_update(&modal, &draft, today()).unwrap();
    settle(&mut crud, &mut modal, &mut notices).await;

    assert!(!modal.is_open());
    assert_eq!(notices.latest().unwrap().message, "Contact updated successfully!");
    assert_eq!(crud.gateway().snapshot().unwrap()[0].role, Role::Viewer);
  }

  #[tokio::test]
  async fn completion_after_close_only_notifies() {
    let mut crud = sqlite_coordinator().await;
    let mut modal = ModalState::default();
    let mut notices = Notices::default();

    modal.open_create();
    crud.submit_create(&modal, &ada_draft(), today()).unwrap();
    modal.close();
    let other = crud
      .gateway()
      .create(ada_draft().validate(today()).unwrap())
      .await
      .unwrap();
    modal.open_view(other);

    settle(&mut crud, &mut modal, &mut notices).await;
    assert!(matches!(modal.active(), Some(Modal::View(_))));
    assert_eq!(notices.latest().unwrap().message, "Contact created successfully!");
  }

  #[tokio::test]
  async fn delete_of_missing_contact_closes_the_modal() {
    let mut crud = sqlite_coordinator().await;
    let mut modal = ModalState::default();
    let mut notices = Notices::default();
    let created = crud
      .gateway()
      .create(ada_draft().validate(today()).unwrap())
      .await
      .unwrap();
    crud.gateway().store().delete(&created.id).await.unwrap();

    modal.open_delete(created);
    crud.submit_delete(&modal).unwrap();
    assert!(crud.is_busy());
    settle(&mut crud, &mut modal, &mut notices).await;

    assert!(!modal.is_open());
    assert_eq!(notices.latest().unwrap().level, Level::Error);
    assert!(!crud.is_busy());
  }

  #[tokio::test]
  async fn failed_delete_keeps_confirmation_open() {
    let mut crud = Coordinator::new(Arc::new(Gateway::new(Unreachable::default())));
    let mut modal = ModalState::default();
    let mut notices = Notices::default();
    let data = ada_draft().validate(today()).unwrap();
    let target = Contact {
      id:         "1".into(),
      first_name: data.first_name,
      last_name:  data.last_name,
      email:      data.email,
      role:       data.role,
      gender:     data.gender,
      is_active:  data.is_active,
      newsletter: data.newsletter,
      birth_date: data.birth_date,
      created_at: None,
      updated_at: None,
    };

    modal.open_delete(target);
    crud.submit_delete(&modal).unwrap();
    settle(&mut crud, &mut modal, &mut notices).await;

    assert!(matches!(modal.active(), Some(Modal::Delete(_))));
    assert_eq!(notices.latest().unwrap().message, "Failed to delete contact. Please try again.");
  }
}
