//! CSV serializer: canonical header, one `;`-delimited row per contact.

use crate::model::contact::{Contact, ContactField};
use csv::WriterBuilder;
use std::io::{self, Write};

/// Fixed export delimiter.
pub const EXPORT_DELIMITER: u8 = b';';

/// Writes the header row and one row per contact.
///
/// Missing fields are written as empty strings; values containing the
/// delimiter, quotes or line breaks are quoted.
pub fn write_csv<W: Write>(contacts: &[Contact], writer: W) -> io::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .from_writer(writer);

    writer
        .write_record(ContactField::ALL.iter().map(|field| field.as_str()))
        .map_err(io::Error::from)?;

    for contact in contacts {
        writer
            .write_record(
                ContactField::ALL
                    .iter()
                    .map(|field| contact.fields.get(*field)),
            )
            .map_err(io::Error::from)?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::write_csv;
    use crate::model::contact::{Contact, ContactFields};

    #[test]
    fn header_uses_canonical_names_and_semicolons() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.trim_end(),
            "full_name;first_name;last_name;email;phone;mobile;address;postal_code;city;birthday;website"
        );
    }

    #[test]
    fn contact_without_email_keeps_empty_column() {
        let contact = Contact::new(ContactFields {
            first_name: "Ben".to_string(),
            address: "Weg 1; Hof".to_string(),
            ..ContactFields::default()
        });
        let mut out = Vec::new();
        write_csv(&[contact], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, ";Ben;;;;;\"Weg 1; Hof\";;;;");
    }
}
