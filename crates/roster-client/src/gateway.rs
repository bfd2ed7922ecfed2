//! [`Gateway`]: the cached view of the remote contact collection.
//!
//! The gateway is the only place the in-memory collection is mutated, and it
//! only does so after a request to the underlying store has completed. Readers
//! get immutable [`Snapshot`]s; a mutation replaces the cached vector
//! copy-on-write, so a snapshot already handed out never changes under its
//! holder.
//!
//! Responses are applied in the order they arrive. Two in-flight updates of
//! the same id race, and the last response to arrive wins.

use std::{collections::HashSet, sync::Arc};

use roster_core::{Contact, ContactFormData, Error, Result, store::ContactStore};
use tokio::sync::watch;

/// An immutable view of the collection as of one cache update.
pub type Snapshot = Arc<Vec<Contact>>;

/// Wraps a [`ContactStore`] with an invalidate-on-mutation cache.
pub struct Gateway<S> {
  store: S,
  cache: watch::Sender<Option<Snapshot>>,
}

impl<S> Gateway<S>
where
  S: ContactStore,
  S::Error: Into<Error>,
{
  pub fn new(store: S) -> Self {
    let (cache, _) = watch::channel(None);
    Self { store, cache }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Reads ───────────────────────────────────────────────────────────────────

  /// The last-known collection, or `None` before the first successful list.
  pub fn snapshot(&self) -> Option<Snapshot> { self.cache.borrow().clone() }

  /// Observe every cache change. The receiver starts at the current value.
  pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> { self.cache.subscribe() }

  /// Drop the cached collection; the next [`Gateway::list`] refetches.
  pub fn invalidate(&self) {
    self.cache.send_replace(None);
  }

  /// Fetch the full collection and replace the cache with it.
  pub async fn list(&self) -> Result<Snapshot> {
    let contacts = self.store.list().await.map_err(Into::into)?;
    let snapshot = Arc::new(unique_by_id(contacts));
    tracing::debug!(count = snapshot.len(), "contact list refreshed");
    self.cache.send_replace(Some(snapshot.clone()));
    Ok(snapshot)
  }

  /// Fetch one contact, refreshing its cached copy if the cache is loaded.
  pub async fn get(&self, id: &str) -> Result<Contact> {
    let found = self.store.get(id).await.map_err(Into::into)?;
    let Some(contact) = found else {
      return Err(Error::NotFound(id.to_owned()));
    };
    self.apply(|contacts| {
      if let Some(slot) = contacts.iter_mut().find(|c| c.id == contact.id) {
        *slot = contact.clone();
      }
    });
    Ok(contact)
  }

  // ── Mutations ───────────────────────────────────────────────────────────────

  /// Create a contact and append it to the cache.
  pub async fn create(&self, data: ContactFormData) -> Result<Contact> {
    let contact = self.store.create(data).await.map_err(Into::into)?;
    tracing::info!(id = %contact.id, "contact created");
    self.apply(|contacts| {
      match contacts.iter_mut().find(|c| c.id == contact.id) {
        Some(slot) => *slot = contact.clone(),
        None => contacts.push(contact.clone()),
      }
    });
    Ok(contact)
  }

  /// Replace the mutable fields of `id` and the matching cached entry.
  pub async fn update(&self, id: &str, data: ContactFormData) -> Result<Contact> {
    let updated = self.store.update(id, data).await.map_err(Into::into)?;
    let Some(contact) = updated else {
      self.forget(id);
      return Err(Error::NotFound(id.to_owned()));
    };
    tracing::info!(%id, "contact updated");
    self.apply(|contacts| {
      if let Some(slot) = contacts.iter_mut().find(|c| c.id == contact.id) {
        *slot = contact.clone();
      }
    });
    Ok(contact)
  }

  /// Delete `id` and remove it from the cache.
  pub async fn delete(&self, id: &str) -> Result<()> {
    let existed = self.store.delete(id).await.map_err(Into::into)?;
    self.forget(id);
    if !existed {
      return Err(Error::NotFound(id.to_owned()));
    }
    tracing::info!(%id, "contact deleted");
    Ok(())
  }

  // ── Cache plumbing ──────────────────────────────────────────────────────────

  fn forget(&self, id: &str) {
    self.apply(|contacts| contacts.retain(|c| c.id != id));
  }

  /// Edit the cached collection in place, if one is loaded. Subscribers are
  /// only woken when something changed.
  fn apply(&self, edit: impl FnOnce(&mut Vec<Contact>)) {
    self.cache.send_if_modified(|cache| {
      let Some(snapshot) = cache else {
        return false;
      };
      let mut next: Vec<Contact> = (**snapshot).clone();
      edit(&mut next);
      if next == **snapshot {
        return false;
      }
      *snapshot = Arc::new(next);
      true
    });
  }
}

/// Keep the first record for each id.
fn unique_by_id(contacts: Vec<Contact>) -> Vec<Contact> {
  let mut seen = HashSet::new();
  let total = contacts.len();
  let unique: Vec<Contact> = contacts
    .into_iter()
    .filter(|c| seen.insert(c.id.clone()))
    .collect();
  if unique.len() != total {
    tracing::warn!(dropped = total - unique.len(), "duplicate contact ids in list response");
  }
  unique
}
