//! vCard 3.0 serializer.
//!
//! # Invariants
//! - Every contact yields exactly one `BEGIN:VCARD`..`END:VCARD` record.
//! - `N` and `FN` are always written; other properties only when non-empty.
//! - A non-empty `full_name` is also written verbatim as
//!   `X-ADDRESSBOOK-FULL-NAME`, so re-import restores it even when it equals
//!   the composed name.
//! - Text values are escaped; lines end with CRLF.

use crate::interchange::vcard_text::escape_text;
use crate::mapping::field_mapper::VCARD_FULL_NAME_PROPERTY;
use crate::model::contact::{Contact, ContactFields};
use std::io::{self, Write};

const CRLF: &str = "\r\n";

/// Writes one vCard record per contact.
pub fn write_vcards<W: Write>(contacts: &[Contact], mut writer: W) -> io::Result<()> {
    for contact in contacts {
        write_card(&contact.fields, &mut writer)?;
    }
    writer.flush()
}

fn write_card<W: Write>(fields: &ContactFields, writer: &mut W) -> io::Result<()> {
    let formatted_name = if fields.full_name.is_empty() {
        fields.composed_name()
    } else {
        fields.full_name.clone()
    };

    write!(writer, "BEGIN:VCARD{CRLF}VERSION:3.0{CRLF}")?;
    write!(
        writer,
        "N:{};{};;;{CRLF}",
        escape_text(&fields.last_name),
        escape_text(&fields.first_name)
    )?;
    write!(writer, "FN:{}{CRLF}", escape_text(&formatted_name))?;
    write_optional(writer, VCARD_FULL_NAME_PROPERTY, &fields.full_name)?;

    write_optional(writer, "EMAIL", &fields.email)?;
    write_optional(writer, "TEL;TYPE=CELL", &fields.mobile)?;
    write_optional(writer, "TEL;TYPE=HOME", &fields.phone)?;

    if !(fields.address.is_empty() && fields.city.is_empty() && fields.postal_code.is_empty()) {
        write!(
            writer,
            "ADR;TYPE=HOME:;;{};{};;{};;{CRLF}",
            escape_text(&fields.address),
            escape_text(&fields.city),
            escape_text(&fields.postal_code)
        )?;
    }

    write_optional(writer, "URL", &fields.website)?;
    write_optional(writer, "BDAY", &fields.birthday)?;
    write!(writer, "END:VCARD{CRLF}")
}

fn write_optional<W: Write>(writer: &mut W, property: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    write!(writer, "{property}:{}{CRLF}", escape_text(value))
}
