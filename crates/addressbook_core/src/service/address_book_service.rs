//! Address book use-case service.
//!
//! # Responsibility
//! - Expose the presentation-facing contract: create, update, delete, list,
//!   search, import and export.
//! - Emit one metadata-only log event per mutating use case.
//!
//! # Invariants
//! - Service APIs never bypass the store's write-through persistence.
//! - `update`/`delete` on unknown ids are no-ops that return `false`.
//! - Export never mutates the store.

use crate::export::{export_file, render, ExportError};
use crate::import::{import_file, ImportError, ImportReport};
use crate::interchange::ExchangeFormat;
use crate::model::contact::{Contact, ContactFields, ContactId};
use crate::repo::contact_repo::ContactRepository;
use crate::search::{search_contacts, SearchQuery};
use crate::store::contact_store::{ContactStore, StoreResult};
use log::{error, info};
use std::io;
use std::path::Path;

/// Use-case facade owning the contact store.
pub struct AddressBookService<R: ContactRepository> {
    store: ContactStore<R>,
}

impl<R: ContactRepository> AddressBookService<R> {
    /// Wraps an already-opened store.
    pub fn new(store: ContactStore<R>) -> Self {
        Self { store }
    }

    /// Loads the store from `repo` and wraps it.
    pub fn open(repo: R) -> StoreResult<Self> {
        ContactStore::open(repo).map(Self::new)
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &ContactStore<R> {
        &self.store
    }

    /// Creates a contact, or replaces the one holding the same email, and returns its id.
    pub fn create(&mut self, fields: ContactFields) -> StoreResult<ContactId> {
        let result = self.store.create(fields);
        match &result {
            Ok(id) => info!("event=contact_create module=service status=ok contact_id={id}"),
            Err(err) => error!("event=contact_create module=service status=error error={err}"),
        }
        result
    }

    /// Replaces all fields of a contact. Returns `false` for unknown ids.
    pub fn update(&mut self, id: ContactId, fields: ContactFields) -> StoreResult<bool> {
        let result = self.store.update(id, fields);
        log_keyed_outcome("contact_update", id, &result);
        result
    }

    /// Deletes a contact. Returns `false` for unknown ids.
    pub fn delete(&mut self, id: ContactId) -> StoreResult<bool> {
        let result = self.store.delete(id);
        log_keyed_outcome("contact_delete", id, &result);
        result
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.store.get(id)
    }

    /// All contacts in store order.
    pub fn list(&self) -> &[Contact] {
        self.store.list()
    }

    /// Contacts whose name or email contains the query text.
    pub fn search(&self, query: &SearchQuery) -> Vec<&Contact> {
        search_contacts(self.store.list(), query)
    }

    /// Imports `path` and merges its records by email.
    pub fn import(
        &mut self,
        path: impl AsRef<Path>,
        format: ExchangeFormat,
    ) -> Result<ImportReport, ImportError> {
        let result = import_file(&mut self.store, path, format);
        if let Err(err) = &result {
            error!(
                "event=contact_import module=service status=error format={} error={}",
                format, err
            );
        }
        result
    }

    /// Writes every contact to `path`. Returns the number exported.
    pub fn export(
        &self,
        path: impl AsRef<Path>,
        format: ExchangeFormat,
    ) -> Result<usize, ExportError> {
        export_file(self.store.list(), path, format)
    }

    /// Renders every contact without touching the filesystem.
    pub fn export_to_string(&self, format: ExchangeFormat) -> io::Result<String> {
        render(format, self.store.list())
    }
}

fn log_keyed_outcome<E: std::fmt::Display>(
    event: &str,
    id: ContactId,
    result: &Result<bool, E>,
) {
    match result {
        Ok(true) => info!("event={event} module=service status=ok contact_id={id}"),
        Ok(false) => info!("event={event} module=service status=noop reason=unknown_id contact_id={id}"),
        Err(err) => error!("event={event} module=service status=error contact_id={id} error={err}"),
    }
}
