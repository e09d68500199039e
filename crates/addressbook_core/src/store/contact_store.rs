//! In-memory contact store with write-through persistence.
//!
//! # Responsibility
//! - Hold the ordered contact list loaded in full from the backing file.
//! - Apply create/update/delete and import merges, persisting each one.
//!
//! # Invariants
//! - Every mutation is persisted before the in-memory list changes; a failed
//!   write leaves the list exactly as it was.
//! - `update`/`delete` on an unknown id are no-ops reported as `false`.
//! - A non-empty normalized email belongs to at most one contact: `create`
//!   with a known email replaces that contact, `update` onto another
//!   contact's email is rejected, and `merge_batch` merges by email.

use crate::model::contact::{normalize_email, Contact, ContactFields, ContactId};
use crate::repo::contact_repo::{ContactChange, ContactRepository, RepoError};
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure surfaced to the user as one message.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file could not be read at startup.
    FileUnreadable(RepoError),
    /// Backing file could not be written; the operation was aborted.
    FileUnwritable(RepoError),
    /// Update would give a contact an email another contact already has.
    EmailTaken { owner: ContactId },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileUnreadable(err) => write!(f, "could not read address book: {err}"),
            Self::FileUnwritable(err) => write!(f, "could not save address book: {err}"),
            Self::EmailTaken { owner } => {
                write!(f, "email already belongs to contact {owner}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FileUnreadable(err) | Self::FileUnwritable(err) => Some(err),
            Self::EmailTaken { .. } => None,
        }
    }
}

/// Counts produced by one [`ContactStore::merge_batch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Candidates that became new contacts.
    pub added: usize,
    /// Candidates merged into a contact with the same normalized email.
    pub updated: usize,
}

/// Ordered contact collection keyed by `id`.
pub struct ContactStore<R: ContactRepository> {
    repo: R,
    contacts: Vec<Contact>,
}

impl<R: ContactRepository> ContactStore<R> {
    /// Loads every persisted contact and returns a ready store.
    pub fn open(repo: R) -> StoreResult<Self> {
        let contacts = repo.load_contacts().map_err(StoreError::FileUnreadable)?;
        debug!(
            "event=store_open module=store status=ok contacts={}",
            contacts.len()
        );
        Ok(Self { repo, contacts })
    }

    /// All contacts in creation order.
    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    /// Finds the first contact whose normalized email equals `email`'s.
    ///
    /// Blank input never matches, so contacts without email are never found.
    pub fn find_by_email(&self, email: &str) -> Option<&Contact> {
        let needle = normalize_email(email)?;
        self.contacts
            .iter()
            .find(|contact| contact.normalized_email().as_deref() == Some(needle.as_str()))
    }

    /// Appends a new contact with a fresh id.
    ///
    /// When the normalized email already belongs to a contact, that contact's
    /// fields are replaced instead and its id is returned.
    pub fn create(&mut self, fields: ContactFields) -> StoreResult<ContactId> {
        let fields = fields.normalized();
        if let Some(index) = self.position_by_email(fields.normalized_email(), None) {
            let replacement = Contact::with_id(self.contacts[index].id, fields.clone());
            let persisted = self
                .repo
                .update_contact(&replacement)
                .map_err(StoreError::FileUnwritable)?;
            if persisted {
                let id = replacement.id;
                self.contacts[index] = replacement;
                debug!("event=store_create module=store status=ok mode=merged_by_email");
                return Ok(id);
            }
        }

        let contact = Contact::new(fields);
        self.repo
            .insert_contact(&contact)
            .map_err(StoreError::FileUnwritable)?;
        let id = contact.id;
        self.contacts.push(contact);
        Ok(id)
    }

    /// Replaces all fields of an existing contact.
    pub fn update(&mut self, id: ContactId, fields: ContactFields) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let updated = Contact::with_id(id, fields);
        if let Some(owner) = self.position_by_email(updated.normalized_email(), Some(id)) {
            return Err(StoreError::EmailTaken {
                owner: self.contacts[owner].id,
            });
        }
        let persisted = self
            .repo
            .update_contact(&updated)
            .map_err(StoreError::FileUnwritable)?;
        if persisted {
            self.contacts[index] = updated;
        }
        Ok(persisted)
    }

    /// Removes a contact.
    pub fn delete(&mut self, id: ContactId) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        self.repo
            .delete_contact(id)
            .map_err(StoreError::FileUnwritable)?;
        self.contacts.remove(index);
        Ok(true)
    }

    /// Merges import candidates in order and persists the batch atomically.
    ///
    /// A candidate whose normalized email matches a contact (including one
    /// added earlier in the same batch) overwrites that contact's fields with
    /// its non-empty values and keeps the contact's id. Any other candidate
    /// becomes a new contact.
    pub fn merge_batch<I>(&mut self, candidates: I) -> StoreResult<MergeOutcome>
    where
        I: IntoIterator<Item = ContactFields>,
    {
        let original_len = self.contacts.len();
        let mut working = self.contacts.clone();
        let mut by_email = index_by_email(&working);
        let mut touched = BTreeSet::new();
        let mut outcome = MergeOutcome::default();

        for candidate in candidates {
            let candidate = candidate.normalized();
            let existing = candidate
                .normalized_email()
                .and_then(|email| by_email.get(&email).copied());

            match existing {
                Some(index) => {
                    if working[index].fields.merge_non_empty(&candidate) {
                        touched.insert(index);
                    }
                    outcome.updated += 1;
                }
                None => {
                    let contact = Contact::new(candidate);
                    if let Some(email) = contact.normalized_email() {
                        by_email.insert(email, working.len());
                    }
                    working.push(contact);
                    outcome.added += 1;
                }
            }
        }

        let mut changes = touched
            .iter()
            .filter(|index| **index < original_len)
            .map(|index| ContactChange::Update(working[*index].clone()))
            .collect::<Vec<_>>();
        changes.extend(
            working[original_len..]
                .iter()
                .cloned()
                .map(ContactChange::Insert),
        );

        self.repo
            .apply_changes(&changes)
            .map_err(StoreError::FileUnwritable)?;
        self.contacts = working;

        debug!(
            "event=store_merge module=store status=ok added={} updated={} writes={}",
            outcome.added,
            outcome.updated,
            changes.len()
        );
        Ok(outcome)
    }

    fn position(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }

    /// First contact holding `email`, skipping `except`.
    fn position_by_email(&self, email: Option<String>, except: Option<ContactId>) -> Option<usize> {
        let email = email?;
        self.contacts.iter().position(|contact| {
            Some(contact.id) != except && contact.normalized_email().as_deref() == Some(email.as_str())
        })
    }
}

fn index_by_email(contacts: &[Contact]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (position, contact) in contacts.iter().enumerate() {
        if let Some(email) = contact.normalized_email() {
            index.entry(email).or_insert(position);
        }
    }
    index
}
