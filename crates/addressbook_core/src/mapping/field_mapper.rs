//! Static synonym table from external field names onto the contact schema.
//!
//! # Responsibility
//! - Resolve CSV header names to canonical `ContactField`s.
//! - Resolve vCard property names to the field(s) they populate.
//!
//! # Invariants
//! - Matching is exact on the trimmed, lower-cased token; no fuzzy matching.
//! - Every canonical field name resolves to itself.
//! - Unknown tokens resolve to `None` and are ignored by callers.

use crate::model::contact::ContactField;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const BOM: char = '\u{feff}';

/// Extension property carrying an explicit `full_name` through vCard export.
pub const VCARD_FULL_NAME_PROPERTY: &str = "X-ADDRESSBOOK-FULL-NAME";

const HEADER_SYNONYMS: &[(ContactField, &[&str])] = &[
    (
        ContactField::FullName,
        &[
            "fullname",
            "full name",
            "display_name",
            "displayname",
            "formatted_name",
        ],
    ),
    (
        ContactField::FirstName,
        &[
            "vorname",
            "firstname",
            "givenname",
            "given_name",
            "first name",
        ],
    ),
    (
        ContactField::LastName,
        &[
            "name",
            "nachname",
            "lastname",
            "surname",
            "familyname",
            "family_name",
            "last name",
        ],
    ),
    (
        ContactField::Email,
        &["e-mail", "mail", "email_address", "e-mail-adresse"],
    ),
    (
        ContactField::Phone,
        &[
            "festnetz",
            "tel",
            "telephone",
            "homephone",
            "home_phone",
            "telefon",
        ],
    ),
    (
        ContactField::Mobile,
        &[
            "handy",
            "cell",
            "cellphone",
            "cell_phone",
            "mobil",
            "mobile_phone",
        ],
    ),
    (
        ContactField::Address,
        &["strasse", "straße", "street", "addr", "adresse"],
    ),
    (
        ContactField::PostalCode,
        &["plz", "zip", "postal", "postalcode", "zip_code"],
    ),
    (ContactField::City, &["ort", "town", "stadt"]),
    (
        ContactField::Birthday,
        &["geburtsdatum", "bday", "birthdate", "birth_date"],
    ),
    (
        ContactField::Website,
        &["webseite", "url", "web", "homepage"],
    ),
];

static HEADER_TABLE: Lazy<HashMap<&'static str, ContactField>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for field in ContactField::ALL {
        table.insert(field.as_str(), field);
    }
    for (field, synonyms) in HEADER_SYNONYMS {
        for synonym in *synonyms {
            table.insert(*synonym, *field);
        }
    }
    table
});

/// What a vCard property populates on the canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcardTarget {
    /// Single-valued property mapped onto one field.
    Field(ContactField),
    /// `N`: structured `last;first;additional;prefix;suffix`.
    StructuredName,
    /// `ADR`: structured `pobox;ext;street;city;region;postal;country`.
    Address,
    /// `TEL`: phone or mobile depending on its type parameters.
    Telephone,
    /// Explicit `full_name` written by this crate; preferred over `FN`.
    ExplicitFullName,
}

/// Resolves one CSV header to its canonical field.
pub fn resolve_header(raw: &str) -> Option<ContactField> {
    let key = normalize_token(raw);
    HEADER_TABLE.get(key.as_str()).copied()
}

/// Resolves one vCard property name (without params or group) to its target.
pub fn resolve_vcard_property(raw: &str) -> Option<VcardTarget> {
    match normalize_token(raw).as_str() {
        "n" => Some(VcardTarget::StructuredName),
        "fn" => Some(VcardTarget::Field(ContactField::FullName)),
        "email" => Some(VcardTarget::Field(ContactField::Email)),
        "tel" => Some(VcardTarget::Telephone),
        "adr" => Some(VcardTarget::Address),
        "bday" | "birthday" => Some(VcardTarget::Field(ContactField::Birthday)),
        "url" | "web" | "website" => Some(VcardTarget::Field(ContactField::Website)),
        token if token.eq_ignore_ascii_case(VCARD_FULL_NAME_PROPERTY) => {
            Some(VcardTarget::ExplicitFullName)
        }
        _ => None,
    }
}

fn normalize_token(raw: &str) -> String {
    raw.trim().trim_start_matches(BOM).trim().to_lowercase()
}
