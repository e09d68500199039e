//! Substring search over the in-memory contact list.
//!
//! # Invariants
//! - Matching is case-insensitive against display, first, last and full
//!   name plus email.
//! - Results keep store order.
//! - A blank query matches every contact.

use crate::model::contact::Contact;

/// Search options for list filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// User query text; surrounding whitespace is ignored.
    pub text: String,
    /// Maximum number of hits; `None` returns all.
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: None,
        }
    }
}

/// Returns the contacts matching `query`, in store order.
pub fn search_contacts<'a>(contacts: &'a [Contact], query: &SearchQuery) -> Vec<&'a Contact> {
    let needle = query.text.trim().to_lowercase();
    let limit = query.limit.unwrap_or(usize::MAX);

    contacts
        .iter()
        .filter(|contact| needle.is_empty() || contact_matches(contact, &needle))
        .take(limit)
        .collect()
}

fn contact_matches(contact: &Contact, needle: &str) -> bool {
    let fields = &contact.fields;
    [
        contact.display_name(),
        fields.composed_name(),
        fields.full_name.clone(),
        fields.email.clone(),
    ]
    .iter()
    .any(|haystack| haystack.to_lowercase().contains(needle))
}
