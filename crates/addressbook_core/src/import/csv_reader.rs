//! CSV candidate parser.
//!
//! # Responsibility
//! - Detect the `;`/`,` delimiter from the header line.
//! - Map header columns through the Field Mapper and turn rows into
//!   candidate contacts.
//!
//! # Invariants
//! - A header row is mandatory; without one no candidates are produced.
//! - Rows with a column count different from the header are skipped and
//!   counted, as are undecodable rows and rows with no mapped value.
//! - When several columns map to the same field, the first column wins.

use super::ParsedBatch;
use crate::mapping::field_mapper::resolve_header;
use crate::model::contact::{ContactField, ContactFields};
use csv::ReaderBuilder;
use log::debug;

/// Picks `;` when the header holds at least as many `;` as `,`.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons >= commas {
        b';'
    } else {
        b','
    }
}

/// Parses CSV text into candidates.
///
/// Returns `None` when the text has no header row.
pub fn parse_csv(text: &str) -> Option<ParsedBatch> {
    let header_line = text.lines().find(|line| !line.trim().is_empty())?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().ok()?.clone();
    if headers.is_empty() {
        return None;
    }

    let columns = map_columns(headers.iter());
    debug!(
        "event=csv_parse module=import status=start delimiter={} columns={} mapped={}",
        delimiter as char,
        columns.len(),
        columns.iter().filter(|column| column.is_some()).count()
    );

    let mut batch = ParsedBatch::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(_) => {
                batch.skipped += 1;
                continue;
            }
        };

        if record.len() != columns.len() {
            batch.skipped += 1;
            continue;
        }

        let mut candidate = ContactFields::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            if let Some(field) = column {
                candidate.set(*field, value);
            }
        }

        if candidate.is_blank() {
            batch.skipped += 1;
        } else {
            batch.candidates.push(candidate);
        }
    }

    Some(batch)
}

fn map_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<Option<ContactField>> {
    let mut taken = Vec::new();
    headers
        .map(|header| {
            let field = resolve_header(header)?;
            if taken.contains(&field) {
                return None;
            }
            taken.push(field);
            Some(field)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{detect_delimiter, map_columns, parse_csv};
    use crate::model::contact::ContactField;

    #[test]
    fn delimiter_prefers_semicolon_on_tie_and_majority() {
        assert_eq!(detect_delimiter("vorname;email"), b';');
        assert_eq!(detect_delimiter("first_name,email,phone"), b',');
        assert_eq!(detect_delimiter("email"), b';');
        assert_eq!(detect_delimiter("a;b,c"), b';');
    }

    #[test]
    fn duplicate_columns_keep_first_mapping() {
        let columns = map_columns(["vorname", "firstname", "notes"].into_iter());
        assert_eq!(columns, vec![Some(ContactField::FirstName), None, None]);
    }

    #[test]
    fn missing_header_yields_none() {
        assert!(parse_csv("").is_none());
        assert!(parse_csv("\n\n").is_none());
    }

    #[test]
    fn short_rows_and_blank_rows_are_counted_as_skipped() {
        let batch = parse_csv("vorname;email;notes\nAnna;anna@example.com;x\nBen\n;;only notes\n")
            .expect("header present");
        assert_eq!(batch.candidates.len(), 1);
        assert_eq!(batch.skipped, 2);
        assert_eq!(batch.candidates[0].first_name, "Anna");
    }

    #[test]
    fn quoted_values_keep_embedded_delimiters() {
        let batch = parse_csv("name,street\n\"Meyer\",\"Hauptstr. 1, Hinterhaus\"\n")
            .expect("header present");
        assert_eq!(batch.candidates[0].last_name, "Meyer");
        assert_eq!(batch.candidates[0].address, "Hauptstr. 1, Hinterhaus");
    }
}
