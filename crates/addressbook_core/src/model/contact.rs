//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its ordered field schema.
//! - Provide normalization and merge helpers shared by store and import.
//!
//! # Invariants
//! - `id` is stable and never reused for another contact.
//! - Field values are stored trimmed; an empty string means "missing".
//! - The normalized email (trimmed + lowercase) is the deduplication key.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every contact.
pub type ContactId = Uuid;

/// One column of the canonical contact schema.
///
/// Declaration order is the export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    /// Explicit display name override.
    FullName,
    FirstName,
    LastName,
    Email,
    /// Landline or otherwise untyped number.
    Phone,
    Mobile,
    /// Street line.
    Address,
    PostalCode,
    City,
    Birthday,
    Website,
}

impl ContactField {
    /// All canonical fields in schema order.
    pub const ALL: [ContactField; 11] = [
        ContactField::FullName,
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Mobile,
        ContactField::Address,
        ContactField::PostalCode,
        ContactField::City,
        ContactField::Birthday,
        ContactField::Website,
    ];

    /// Canonical snake_case name, used as CSV header and DB column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Mobile => "mobile",
            Self::Address => "address",
            Self::PostalCode => "postal_code",
            Self::City => "city",
            Self::Birthday => "birthday",
            Self::Website => "website",
        }
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field values of one contact, detached from identity.
///
/// Used as the payload for manual create/update and as the import candidate
/// shape before a contact id is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub birthday: String,
    pub website: String,
}

impl ContactFields {
    /// Returns the value of one canonical field.
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FullName => &self.full_name,
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Mobile => &self.mobile,
            ContactField::Address => &self.address,
            ContactField::PostalCode => &self.postal_code,
            ContactField::City => &self.city,
            ContactField::Birthday => &self.birthday,
            ContactField::Website => &self.website,
        }
    }

    fn slot_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::FullName => &mut self.full_name,
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Mobile => &mut self.mobile,
            ContactField::Address => &mut self.address,
            ContactField::PostalCode => &mut self.postal_code,
            ContactField::City => &mut self.city,
            ContactField::Birthday => &mut self.birthday,
            ContactField::Website => &mut self.website,
        }
    }

    /// Sets one field, storing the trimmed value.
    pub fn set(&mut self, field: ContactField, value: &str) {
        *self.slot_mut(field) = value.trim().to_string();
    }

    /// Sets one field only when it is still empty.
    ///
    /// Returns whether the value was taken.
    pub fn set_if_empty(&mut self, field: ContactField, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || !self.get(field).is_empty() {
            return false;
        }
        *self.slot_mut(field) = value.to_string();
        true
    }

    /// Returns a copy with every value trimmed.
    pub fn normalized(&self) -> Self {
        let mut out = Self::default();
        for field in ContactField::ALL {
            out.set(field, self.get(field));
        }
        out
    }

    /// Whether every field is empty.
    pub fn is_blank(&self) -> bool {
        ContactField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Trimmed, lower-cased email, or `None` when the email is empty.
    pub fn normalized_email(&self) -> Option<String> {
        normalize_email(&self.email)
    }

    /// Overwrites fields with the non-empty values of `incoming`.
    ///
    /// Empty incoming values leave the current value untouched. Returns
    /// whether any value changed.
    pub fn merge_non_empty(&mut self, incoming: &ContactFields) -> bool {
        let mut changed = false;
        for field in ContactField::ALL {
            let value = incoming.get(field).trim();
            if value.is_empty() || self.get(field) == value {
                continue;
            }
            *self.slot_mut(field) = value.to_string();
            changed = true;
        }
        changed
    }

    /// `first_name last_name`, trimmed; empty when both are empty.
    pub fn composed_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Name shown in lists: explicit full name, composed name, or email.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.trim().to_string();
        }
        let composed = self.composed_name();
        if !composed.is_empty() {
            return composed;
        }
        self.email.trim().to_string()
    }
}

/// Canonical address-book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable ID used by presentation surfaces and merge bookkeeping.
    pub id: ContactId,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Contact {
    /// Creates a contact with a freshly generated ID and normalized fields.
    pub fn new(fields: ContactFields) -> Self {
        Self::with_id(Uuid::new_v4(), fields)
    }

    /// Creates a contact with a caller-provided ID.
    ///
    /// Used by the persistence layer when rehydrating stored rows.
    pub fn with_id(id: ContactId, fields: ContactFields) -> Self {
        Self {
            id,
            fields: fields.normalized(),
        }
    }

    pub fn normalized_email(&self) -> Option<String> {
        self.fields.normalized_email()
    }

    pub fn display_name(&self) -> String {
        self.fields.display_name()
    }
}

/// Normalizes an email for deduplication lookups.
pub fn normalize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, Contact, ContactField, ContactFields};

    #[test]
    fn schema_order_matches_canonical_names() {
        let names = ContactField::ALL
            .iter()
            .map(|field| field.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names[0], "full_name");
        assert_eq!(names[3], "email");
        assert_eq!(names[10], "website");
    }

    #[test]
    fn merge_keeps_existing_values_for_empty_incoming_fields() {
        let mut current = ContactFields {
            first_name: "Anna".to_string(),
            phone: "0301234".to_string(),
            ..ContactFields::default()
        };
        let incoming = ContactFields {
            first_name: "  ".to_string(),
            city: "Berlin".to_string(),
            ..ContactFields::default()
        };

        assert!(current.merge_non_empty(&incoming));
        assert_eq!(current.first_name, "Anna");
        assert_eq!(current.phone, "0301234");
        assert_eq!(current.city, "Berlin");
        assert!(!current.merge_non_empty(&incoming));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Anna@Example.COM ").as_deref(),
            Some("anna@example.com")
        );
        assert_eq!(normalize_email("   "), None);
    }

    #[test]
    fn display_name_falls_back_to_composed_name_then_email() {
        let mut fields = ContactFields {
            email: "x@example.com".to_string(),
            ..ContactFields::default()
        };
        assert_eq!(fields.display_name(), "x@example.com");

        fields.last_name = "Meyer".to_string();
        assert_eq!(fields.display_name(), "Meyer");

        fields.full_name = "Dr. A. Meyer".to_string();
        assert_eq!(fields.display_name(), "Dr. A. Meyer");
    }

    #[test]
    fn new_contact_trims_fields() {
        let contact = Contact::new(ContactFields {
            email: " anna@example.com ".to_string(),
            ..ContactFields::default()
        });
        assert_eq!(contact.fields.email, "anna@example.com");
    }

    #[test]
    fn contact_serializes_flat_and_tolerates_missing_fields() {
        let contact = Contact::new(ContactFields {
            first_name: "Anna".to_string(),
            ..ContactFields::default()
        });
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["first_name"], "Anna");
        assert_eq!(value["id"], contact.id.to_string());

        let parsed: Contact = serde_json::from_str(&format!(
            r#"{{"id":"{}","email":"a@b.de"}}"#,
            contact.id
        ))
        .unwrap();
        assert_eq!(parsed.fields.email, "a@b.de");
        assert_eq!(parsed.fields.first_name, "");
    }
}
