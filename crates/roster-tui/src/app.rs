//! Application state machine and event dispatcher.

use std::{sync::Arc, time::Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_client::{Gateway, Snapshot};
use roster_core::{Contact, Error, store::ContactStore};
use tokio::sync::watch;

use crate::{
  crud::{Coordinator, Operation, SubmitError},
  form::FormState,
  modal::{Modal, ModalState},
  notice::Notices,
  table::{Column, TableState},
};

// ─── Mode ─────────────────────────────────────────────────────────────────────

/// What the keyboard is driving when no modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing into the global search bar.
  Search,
  /// Typing a filter for one column.
  Filter(Column),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub mode: Mode,

  /// Sort, filters and search applied to the collection.
  pub table: TableState,

  /// Index into [`Column::ALL`] of the focused column.
  pub column_cursor: usize,

  /// Cursor position within the *visible* rows.
  pub row_cursor: usize,

  pub modal: ModalState,

  /// Present while a create or edit modal is open.
  pub form: Option<FormState>,

  pub notices: Notices,

  pub crud: Coordinator<S>,

  /// Last snapshot seen from the gateway.
  pub contacts: Snapshot,

  /// Whether any list has succeeded yet.
  pub loaded: bool,

  changes: watch::Receiver<Option<Snapshot>>,
}

impl<S> App<S> {
  // ── View ──────────────────────────────────────────────────────────────────

  pub fn focused_column(&self) -> Column { Column::ALL[self.column_cursor] }

  pub fn visible_rows(&self) -> Vec<&Contact> { self.table.visible_rows(&self.contacts) }

  /// The contact under the row cursor, if any.
  pub fn cursor_contact(&self) -> Option<&Contact> {
    self.visible_rows().get(self.row_cursor).copied()
  }

  /// Operation the open form would submit.
  pub fn form_operation(&self) -> Option<Operation> {
    match self.modal.active()? {
      Modal::Create => Some(Operation::Create),
      Modal::Edit(_) => Some(Operation::Update),
      _ => None,
    }
  }
}

impl<S> App<S>
where
  S: ContactStore + 'static,
  S::Error: Into<Error>,
{
  pub fn new(gateway: Arc<Gateway<S>>) -> Self {
    let changes = gateway.subscribe();
    Self {
      mode: Mode::Normal,
      table: TableState::default(),
      column_cursor: 0,
      row_cursor: 0,
      modal: ModalState::default(),
      form: None,
      notices: Notices::default(),
      crud: Coordinator::new(gateway),
      contacts: Arc::new(Vec::new()),
      loaded: false,
      changes,
    }
  }

  // ── Per-tick housekeeping ─────────────────────────────────────────────────

  /// Apply finished requests, pick up cache changes, and expire notices.
  pub fn tick(&mut self) {
    let applied = self
      .crud
      .apply_completions(&mut self.modal, &mut self.notices);
    if applied > 0 && !self.modal.is_open() {
      self.form = None;
    }
    self.sync();
    self.notices.expire(Instant::now());
  }

  /// Pull the latest snapshot and keep the cursor and modal consistent with it.
  pub fn sync(&mut self) {
    if self.changes.has_changed().unwrap_or(false) {
      let latest = self.changes.borrow_and_update().clone();
      if let Some(snapshot) = latest {
        self.contacts = snapshot;
        self.loaded = true;
      }
    }

    // While a mutation is in flight its own completion decides what happens
    // to the modal.
    if self.loaded
      && !self.crud.is_busy()
      && let Some(target) = self.modal.target()
    {
      let latest = self.contacts.iter().find(|c| c.id == target.id).cloned();
      let changed = latest.as_ref() != Some(target);
      match latest {
        None => {
          self.close_modal();
          self.notices.push_info("That contact no longer exists.");
        }
        Some(latest) if changed => self.modal.retarget(latest),
        Some(_) => {}
      }
    }

    let len = self.visible_rows().len();
    self.row_cursor = self.row_cursor.min(len.saturating_sub(1));
  }

  fn close_modal(&mut self) {
    self.modal.close();
    self.form = None;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.modal.active() {
      Some(Modal::Create | Modal::Edit(_)) => {
        self.handle_form_key(key);
        return true;
      }
      Some(Modal::View(_)) => {
        self.handle_view_key(key);
        return true;
      }
      Some(Modal::Delete(_)) => {
        self.handle_delete_key(key);
        return true;
      }
      None => {}
    }

    match self.mode {
      Mode::Search => self.handle_search_key(key),
      Mode::Filter(column) => self.handle_filter_key(key, column),
      Mode::Normal => return self.handle_table_key(key),
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let mut term = self.table.search().to_owned();
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        term.clear();
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        term.pop();
      }
      KeyCode::Char(c) => term.push(c),
      _ => return,
    }
    self.table.set_search(term);
    self.row_cursor = 0;
  }

  fn handle_filter_key(&mut self, key: KeyEvent, column: Column) {
    let mut value = self.table.filter(column).unwrap_or_default().to_owned();
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        value.clear();
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        value.pop();
      }
      KeyCode::Char(c) => value.push(c),
      _ => return,
    }
    self.table.set_filter(column, value);
    self.row_cursor = 0;
  }

  fn handle_table_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      // Rows
      KeyCode::Down | KeyCode::Char('j') => {
        if self.row_cursor + 1 < self.visible_rows().len() {
          self.row_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.row_cursor = self.row_cursor.saturating_sub(1);
      }

      // Columns
      KeyCode::Right | KeyCode::Char('l') => {
        self.column_cursor = (self.column_cursor + 1) % Column::ALL.len();
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.column_cursor = (self.column_cursor + Column::ALL.len() - 1) % Column::ALL.len();
      }
      KeyCode::Char('s') => self.table.toggle_sort(self.focused_column()),
      KeyCode::Char('f') => self.mode = Mode::Filter(self.focused_column()),
      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Esc => {
        self.table.set_search("");
        for column in Column::ALL {
          self.table.set_filter(column, "");
        }
        self.row_cursor = 0;
      }

      // Actions
      KeyCode::Char('r') => self.crud.refresh(),
      KeyCode::Char('n') => {
        self.modal.open_create();
        self.form = Some(FormState::for_create(today()));
      }
      KeyCode::Enter | KeyCode::Char('v') => {
        if let Some(c) = self.cursor_contact().cloned() {
          self.modal.open_view(c);
        }
      }
      KeyCode::Char('e') => {
        if let Some(c) = self.cursor_contact().cloned() {
          self.open_edit(c);
        }
      }
      KeyCode::Char('d') => {
        if let Some(c) = self.cursor_contact().cloned() {
          self.modal.open_delete(c);
        }
      }
      _ => {}
    }
    true
  }

  fn open_edit(&mut self, contact: Contact) {
    self.form = Some(FormState::for_edit(&contact));
    self.modal.open_edit(contact);
  }

  fn handle_view_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('e') => {
        if let Some(c) = self.modal.target().cloned() {
          self.open_edit(c);
        }
      }
      KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.close_modal(),
      _ => {}
    }
  }

  fn handle_delete_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => {
        if self.crud.is_loading(Operation::Delete) {
          return;
        }
        if let Err(e) = self.crud.submit_delete(&self.modal) {
          self.notices.push_error(e.to_string());
        }
      }
      KeyCode::Char('n') | KeyCode::Esc => self.close_modal(),
      _ => {}
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => return self.close_modal(),
      KeyCode::Enter => return self.submit_form(),
      _ => {}
    }
    let Some(form) = self.form.as_mut() else {
      return;
    };
    match key.code {
      KeyCode::Tab | KeyCode::Down => form.focus_next(),
      KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
      KeyCode::Right => form.cycle(true),
      KeyCode::Left => form.cycle(false),
      KeyCode::Backspace => form.backspace(),
      KeyCode::Char(c) => form.input_char(c),
      _ => {}
    }
  }

  fn submit_form(&mut self) {
    let (Some(op), Some(form)) = (self.form_operation(), self.form.as_mut()) else {
      return;
    };
    if self.crud.is_loading(op) {
      return;
    }
    let draft = form.draft.clone();
    let submitted = match op {
      Operation::Create => self.crud.submit_create(&self.modal, &draft, today()),
      _ => self.crud.submit_update(&self.modal, &draft, today()),
    };
    match submitted {
      Ok(()) => form.errors = Default::default(),
      Err(SubmitError::Invalid(errors)) => form.show_errors(errors),
      Err(e) => self.notices.push_error(e.to_string()),
    }
  }
}

fn today() -> NaiveDate { Local::now().date_naive() }
