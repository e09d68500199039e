//! vCard 2.1/3.0 candidate parser.
//!
//! # Responsibility
//! - Split a file into `BEGIN:VCARD`/`END:VCARD` records.
//! - Map recognized properties onto candidate contact fields.
//!
//! # Invariants
//! - A record without its terminating `END:VCARD` is dropped and counted.
//! - Unknown or malformed property lines are ignored.
//! - For single-valued slots the first occurrence wins.

use super::ParsedBatch;
use crate::interchange::vcard_text::{parse_content_line, unfold_lines, ContentLine};
use crate::mapping::field_mapper::{resolve_vcard_property, VcardTarget};
use crate::model::contact::{ContactField, ContactFields};

/// Parses every complete vCard record in `text`.
pub fn parse_vcards(text: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    let mut current: Option<CardBuilder> = None;

    for line in unfold_lines(text) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("BEGIN:VCARD") {
            if current.replace(CardBuilder::default()).is_some() {
                batch.skipped += 1;
            }
            continue;
        }

        if line.eq_ignore_ascii_case("END:VCARD") {
            if let Some(card) = current.take() {
                match card.finish() {
                    Some(candidate) => batch.candidates.push(candidate),
                    None => batch.skipped += 1,
                }
            }
            continue;
        }

        if let (Some(card), Some(content)) = (current.as_mut(), parse_content_line(line)) {
            card.apply(&content);
        }
    }

    if current.is_some() {
        batch.skipped += 1;
    }

    batch
}

#[derive(Debug, Default)]
struct CardBuilder {
    fields: ContactFields,
    has_structured_name: bool,
    formatted_name: Option<String>,
    explicit_full_name: Option<String>,
}

impl CardBuilder {
    fn apply(&mut self, line: &ContentLine) {
        let Some(target) = resolve_vcard_property(&line.name) else {
            return;
        };

        match target {
            VcardTarget::StructuredName => {
                if self.has_structured_name {
                    return;
                }
                self.has_structured_name = true;
                let parts = line.structured_value();
                self.set_part(ContactField::LastName, &parts, 0);
                self.set_part(ContactField::FirstName, &parts, 1);
            }
            VcardTarget::Field(ContactField::FullName) => {
                if self.formatted_name.is_none() {
                    self.formatted_name = Some(line.text_value().trim().to_string());
                }
            }
            VcardTarget::Field(field) => {
                self.fields.set_if_empty(field, &line.text_value());
            }
            VcardTarget::ExplicitFullName => {
                if self.explicit_full_name.is_none() {
                    self.explicit_full_name = Some(line.text_value().trim().to_string());
                }
            }
            VcardTarget::Telephone => self.apply_telephone(line),
            VcardTarget::Address => {
                let parts = line.structured_value();
                self.set_part(ContactField::Address, &parts, 2);
                self.set_part(ContactField::City, &parts, 3);
                self.set_part(ContactField::PostalCode, &parts, 5);
            }
        }
    }

    fn apply_telephone(&mut self, line: &ContentLine) {
        let number = line.text_value();
        if number.trim().is_empty() {
            return;
        }

        if line.has_type("CELL") || line.has_type("MOBILE") {
            self.fields.set_if_empty(ContactField::Mobile, &number);
        } else if line.has_type("HOME") || line.has_type("VOICE") {
            self.fields.set_if_empty(ContactField::Phone, &number);
        } else if !self.fields.set_if_empty(ContactField::Phone, &number) {
            self.fields.set_if_empty(ContactField::Mobile, &number);
        }
    }

    fn set_part(&mut self, field: ContactField, parts: &[String], index: usize) {
        if let Some(value) = parts.get(index) {
            self.fields.set_if_empty(field, value);
        }
    }

    /// Resolves `FN` against `N` and returns `None` for an empty record.
    ///
    /// An explicit full-name property wins; otherwise `FN` becomes
    /// `full_name` only when it differs from the composed name.
    fn finish(mut self) -> Option<ContactFields> {
        if let Some(formatted) = self.formatted_name.take() {
            if !self.has_structured_name {
                split_formatted_name(&mut self.fields, &formatted);
            }
            let explicit = self.explicit_full_name.is_some();
            if !explicit && !formatted.is_empty() && formatted != self.fields.composed_name() {
                self.fields.set(ContactField::FullName, &formatted);
            }
        }
        if let Some(full_name) = self.explicit_full_name.take() {
            self.fields.set(ContactField::FullName, &full_name);
        }

        if self.fields.is_blank() {
            None
        } else {
            Some(self.fields)
        }
    }
}

/// Splits `FN` into first/last name; the last token is the last name.
fn split_formatted_name(fields: &mut ContactFields, formatted: &str) {
    match formatted.rsplit_once(char::is_whitespace) {
        Some((first, last)) => {
            fields.set_if_empty(ContactField::FirstName, first);
            fields.set_if_empty(ContactField::LastName, last);
        }
        None => {
            fields.set_if_empty(ContactField::LastName, formatted);
        }
    }
}
